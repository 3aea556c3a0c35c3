use glam::Vec2;

/// A single draw command. The rendering surface itself is external; the
/// simulation only emits these, in back-to-front order, once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Filled disc
    CircleFill {
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    /// Circle outline
    CircleStroke {
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    /// Filled closed polygon (vertices in order, implicitly closed)
    Polygon { points: Vec<Vec2>, color: [f32; 4] },
    Line {
        from: Vec2,
        to: Vec2,
        color: [f32; 4],
    },
    /// Axis-aligned filled rectangle
    Rect {
        min: Vec2,
        max: Vec2,
        color: [f32; 4],
    },
    /// Full-screen overlay wash (flashes, sink darkening)
    Overlay { color: [f32; 4] },
}

/// One frame's worth of draw commands.
///
/// List order is the layering contract: earlier commands are behind later
/// ones. `shake` is a translation applied to everything except overlays.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub shake: Vec2,
    pub cmds: Vec<DrawCmd>,
}

impl Frame {
    pub fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        self.cmds.push(DrawCmd::CircleFill {
            center,
            radius,
            color,
        });
    }
}
