use glam::Vec2;
use starforge_core::constants::*;
use starforge_core::{DeathBranch, DrawCmd, Frame, Rgb, ScenePhase, SimConfig};
use starforge_physics::color::star_color;
use starforge_physics::field::RandomField;

/// Raised by [`Star::step`] exactly once, on the tick its life runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarEvent {
    LifeExpired,
}

/// The single evolving star of a session.
///
/// Color, target size, and lifetime are derived once at construction from
/// mass (and the inherited legacy color) and never change afterwards.
#[derive(Debug, Clone)]
pub struct Star {
    /// Fixed after creation
    pub pos: Vec2,
    pub mass: f32,
    pub instability: f32,
    /// Current diameter, ramps toward `target_size` during formation
    pub size: f32,
    pub target_size: f32,
    /// 0-255, ramps toward max during formation
    pub alpha: f32,
    /// Remaining life in frames, counts down during observation
    pub life: f32,
    pub color: Rgb,
    pub branch: Option<DeathBranch>,
    pub death_resolved: bool,
    growth_rate: f32,
    alpha_rate: f32,
    expired_reported: bool,
}

impl Star {
    pub fn new(
        pos: Vec2,
        mass: f32,
        instability: f32,
        legacy: Option<Rgb>,
        config: &SimConfig,
    ) -> Self {
        let target_size = config.target_size(mass);
        let formation = config.formation_frames.max(1) as f32;
        Self {
            pos,
            mass,
            instability,
            size: 0.0,
            target_size,
            alpha: 0.0,
            life: config.life_for_mass(mass),
            color: star_color(mass, legacy),
            branch: None,
            death_resolved: false,
            growth_rate: target_size / formation,
            alpha_rate: ALPHA_MAX / formation,
            expired_reported: false,
        }
    }

    /// Advance one tick. Formation ramps size/alpha (clamped, never
    /// overshooting); observation burns life and reports the expiry
    /// crossing exactly once.
    pub fn step(&mut self, phase: ScenePhase) -> Option<StarEvent> {
        match phase {
            ScenePhase::StarFormation => {
                self.size = (self.size + self.growth_rate).min(self.target_size);
                self.alpha = (self.alpha + self.alpha_rate).min(ALPHA_MAX);
                None
            }
            ScenePhase::Observation => {
                self.life -= 1.0;
                if self.life <= 0.0 && !self.expired_reported {
                    self.expired_reported = true;
                    Some(StarEvent::LifeExpired)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Periodic size offset. Amplitude and frequency both grow with
    /// instability; very unstable stars pick up an irregular noise term.
    pub fn pulsation(&self, frame: u64, field: &RandomField) -> f32 {
        let k = self.instability / 100.0;
        let amplitude = k * 6.0;
        let freq = 0.02 + k * 0.09;
        let mut offset = (frame as f32 * freq).sin() * amplitude;
        if self.instability > NOISY_PULSE_INSTABILITY {
            offset += (field.noise1(frame as f64 * 0.05) - 0.5) * k * 8.0;
        }
        offset
    }

    pub fn visual_size(&self, frame: u64, field: &RandomField) -> f32 {
        self.size + self.pulsation(frame, field)
    }

    pub fn draw(&self, frame_no: u64, phase: ScenePhase, field: &RandomField, out: &mut Frame) {
        if self.alpha <= 0.0 {
            return;
        }
        if phase == ScenePhase::BlackHoleSink {
            self.draw_event_horizon(out);
            return;
        }
        // Once the collapse has played out, the black-hole visual owned
        // by the universe is all that remains of this star.
        if self.death_resolved && self.branch == Some(DeathBranch::BlackHole) {
            return;
        }

        let half = (self.visual_size(frame_no, field) * 0.5).max(0.0);

        // Glow halo, outer ring first so the inner ones layer on top.
        for i in (1..=GLOW_RINGS).rev() {
            let radius = half * (1.0 + i as f32 * 0.35);
            let alpha = self.alpha * 0.18 / i as f32;
            out.circle(self.pos, radius, self.color.rgba(alpha));
        }

        // Main body: smooth disc when calm, noise-displaced polygon when
        // instability crosses the threshold.
        if self.instability <= POLYGON_INSTABILITY {
            out.circle(self.pos, half, self.color.rgba(self.alpha));
        } else {
            let mut points = Vec::with_capacity(BODY_VERTICES);
            for i in 0..BODY_VERTICES {
                let angle = std::f32::consts::TAU * i as f32 / BODY_VERTICES as f32;
                let wobble = field.noise3(
                    angle.cos() as f64 * 0.8 + 1.7,
                    angle.sin() as f64 * 0.8 + 1.7,
                    frame_no as f64 * 0.02,
                ) - 0.5;
                let radius = half + wobble * self.instability * 0.3;
                points.push(self.pos + Vec2::new(angle.cos(), angle.sin()) * radius.max(0.0));
            }
            out.push(DrawCmd::Polygon {
                points,
                color: self.color.rgba(self.alpha),
            });
        }

        // Massive stars get cross streaks through the body.
        if self.mass > STREAK_MASS {
            let reach = half * 3.0;
            let streak = Rgb::new(255.0, 255.0, 255.0).rgba(self.alpha * 0.25);
            out.push(DrawCmd::Line {
                from: self.pos - Vec2::new(reach, 0.0),
                to: self.pos + Vec2::new(reach, 0.0),
                color: streak,
            });
            out.push(DrawCmd::Line {
                from: self.pos - Vec2::new(0.0, reach),
                to: self.pos + Vec2::new(0.0, reach),
                color: streak,
            });
        }
    }

    /// Sink-phase rendering: opaque horizon disc, bright rim, faint
    /// accretion rings.
    fn draw_event_horizon(&self, out: &mut Frame) {
        let half = (self.size * 0.5).max(4.0);
        for i in 1..=3 {
            let radius = half * (1.2 + i as f32 * 0.45);
            let alpha = self.alpha * 0.08 / i as f32;
            out.circle(self.pos, radius, self.color.rgba(alpha));
        }
        out.circle(self.pos, half, Rgb::new(4.0, 2.0, 8.0).rgba(255.0));
        out.push(DrawCmd::CircleStroke {
            center: self.pos,
            radius: half,
            color: Rgb::new(255.0, 240.0, 210.0).rgba(220.0),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(mass: f32, instability: f32) -> Star {
        Star::new(
            Vec2::new(100.0, 100.0),
            mass,
            instability,
            None,
            &SimConfig::default(),
        )
    }

    #[test]
    fn test_formation_ramps_and_clamps() {
        let mut s = star(60.0, 10.0);
        let config = SimConfig::default();
        for _ in 0..config.formation_frames * 2 {
            let prev = s.size;
            s.step(ScenePhase::StarFormation);
            assert!(s.size >= prev);
            assert!(s.size <= s.target_size + 1e-3, "size overshot target");
            assert!(s.alpha <= ALPHA_MAX + 1e-3, "alpha overshot max");
        }
        assert!((s.size - s.target_size).abs() < 1e-3);
        assert!((s.alpha - ALPHA_MAX).abs() < 1e-3);
    }

    #[test]
    fn test_life_expiry_reported_exactly_once() {
        let mut s = star(30.0, 0.0);
        s.life = 2.0;
        assert_eq!(s.step(ScenePhase::Observation), None);
        assert_eq!(
            s.step(ScenePhase::Observation),
            Some(StarEvent::LifeExpired)
        );
        for _ in 0..10 {
            assert_eq!(s.step(ScenePhase::Observation), None);
        }
    }

    #[test]
    fn test_pulsation_amplitude_grows_with_instability() {
        let field = RandomField::new(5);
        let calm = star(50.0, 5.0);
        let wild = star(50.0, 95.0);
        let max_offset = |s: &Star| {
            (0..200u64)
                .map(|f| s.pulsation(f, &field).abs())
                .fold(0.0f32, f32::max)
        };
        assert!(max_offset(&wild) > max_offset(&calm));
    }

    #[test]
    fn test_color_deterministic_for_same_inputs() {
        let a = star(77.0, 40.0);
        let b = star(77.0, 40.0);
        assert_eq!(a.color, b.color);
    }

    #[test]
    fn test_faded_star_draws_nothing() {
        let mut s = star(20.0, 10.0);
        s.alpha = 0.0;
        let field = RandomField::new(1);
        let mut frame = Frame::default();
        s.draw(0, ScenePhase::End, &field, &mut frame);
        assert!(frame.cmds.is_empty());
    }

    #[test]
    fn test_unstable_star_renders_polygon_body() {
        let mut s = star(50.0, POLYGON_INSTABILITY + 10.0);
        s.size = s.target_size;
        s.alpha = ALPHA_MAX;
        let field = RandomField::new(1);
        let mut frame = Frame::default();
        s.draw(10, ScenePhase::Observation, &field, &mut frame);
        assert!(
            frame
                .cmds
                .iter()
                .any(|c| matches!(c, DrawCmd::Polygon { .. })),
            "unstable star should render a polygon body"
        );
    }
}
