use glam::Vec2;

/// User input, produced by the render layer and consumed by the scene
/// controller once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a world position (crosshair tracking)
    PointerMoved(Vec2),
    /// Pointer clicked at a world position
    PointerClick(Vec2),
    /// Slider values changed (mass and instability, each in [0, 100])
    SetParameters { mass: f32, instability: f32 },
    /// Confirm the current screen (start, or lock in parameters)
    Confirm,
    /// Return to the initial screen after a star has died
    Restart,
}
