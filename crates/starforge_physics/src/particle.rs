use glam::Vec2;
use starforge_core::constants::*;
use starforge_core::{Frame, Rgb, ScenePhase};

/// How a particle moves, fixed at construction. The scene phase still
/// gates Seeking and Collapsing (they only act in their own phases), but
/// a particle never changes variant after it is spawned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    /// Idle oscillation around a fixed base point; never decays
    Ambient { base: Vec2, phase: f32 },
    /// Accelerates toward the forming star, absorbed near it
    Seeking,
    /// Ballistic with friction and a per-particle fade rate
    Explosive { fade: f32 },
    /// Dragged straight toward the sink point, velocity model bypassed
    Collapsing,
}

/// Per-tick context passed into every particle step. Carries what used
/// to be ambient globals: the frame counter, the scene phase, and the
/// current attraction point (star or sink), if any.
#[derive(Debug, Clone, Copy)]
pub struct StepCtx {
    pub frame: u64,
    pub phase: ScenePhase,
    pub attractor: Option<Vec2>,
}

/// A single point-mass with visual decay.
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    acc: Vec2,
    /// Disc radius in world units
    pub size: f32,
    /// 0-255; the particle is swept by its owner once this reaches 0
    pub alpha: f32,
    pub color: Rgb,
    /// Velocity retained per frame by ballistic movement, in (0, 1]
    pub friction: f32,
    pub behavior: Behavior,
}

impl Particle {
    pub fn new(pos: Vec2, size: f32, alpha: f32, color: Rgb, behavior: Behavior) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            size,
            alpha,
            color,
            friction: EXPLOSIVE_FRICTION,
            behavior,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Accumulate a force into the acceleration. No immediate effect;
    /// integration happens in [`Particle::step`].
    pub fn apply_force(&mut self, force: Vec2) {
        self.acc += force;
    }

    /// Advance exactly one simulation tick.
    pub fn step(&mut self, ctx: &StepCtx) {
        match self.behavior {
            Behavior::Ambient { base, phase } => {
                let t = ctx.frame as f32;
                let offset = Vec2::new(
                    (t * 0.011 + phase).sin(),
                    (t * 0.013 + phase * 1.7).cos(),
                ) * 1.5;
                self.pos = base + offset;
            }
            Behavior::Seeking => {
                if ctx.phase != ScenePhase::StarFormation {
                    return;
                }
                let Some(target) = ctx.attractor else { return };
                let to_target = target - self.pos;
                if to_target.length() < CAPTURE_RADIUS {
                    // Absorbed by the star: fade sharply in place.
                    self.alpha -= ABSORB_FADE;
                    return;
                }
                self.apply_force(to_target.normalize_or_zero() * SEEK_FORCE);
                self.vel = (self.vel + self.acc).clamp_length_max(SEEK_MAX_SPEED);
                self.pos += self.vel;
                self.acc = Vec2::ZERO;
            }
            Behavior::Explosive { fade } => {
                self.vel *= self.friction;
                self.pos += self.vel;
                self.alpha -= fade;
            }
            Behavior::Collapsing => {
                if ctx.phase != ScenePhase::BlackHoleSink {
                    return;
                }
                let Some(sink) = ctx.attractor else { return };
                let dir = (sink - self.pos).normalize_or_zero();
                self.pos += dir * COLLAPSE_PULL_SPEED;
                self.alpha -= COLLAPSE_FADE;
            }
        }
    }

    /// Alpha at or below zero means fully transparent; the owner removes
    /// the particle on its next sweep.
    pub fn is_expired(&self) -> bool {
        self.alpha <= 0.0
    }

    pub fn draw(&self, frame: &mut Frame) {
        if self.alpha <= 0.0 {
            return;
        }
        frame.circle(self.pos, self.size, self.color.rgba(self.alpha));
    }
}
