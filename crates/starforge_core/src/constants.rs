// Tuning constants (world units are pixels, time unit is one frame).
// Alpha values follow the 0-255 convention of the particle fields; draw
// commands carry [0, 1] RGBA.

/// Maximum particle/star alpha
pub const ALPHA_MAX: f32 = 255.0;

/// Force applied to dust seeking the forming star (units/frame^2)
pub const SEEK_FORCE: f32 = 0.12;

/// Speed cap for seeking dust (units/frame)
pub const SEEK_MAX_SPEED: f32 = 2.6;

/// Distance at which seeking dust counts as absorbed by the star
pub const CAPTURE_RADIUS: f32 = 6.0;

/// Alpha lost per frame by an absorbed dust particle
pub const ABSORB_FADE: f32 = 24.0;

/// Velocity retained per frame by ballistic particles
pub const EXPLOSIVE_FRICTION: f32 = 0.94;

/// Pull speed of the black-hole sink (units/frame, applied to position directly)
pub const COLLAPSE_PULL_SPEED: f32 = 7.5;

/// Alpha lost per frame by a collapsing particle
pub const COLLAPSE_FADE: f32 = 9.0;

/// Shake magnitude retained per frame
pub const SHAKE_DECAY: f32 = 0.88;

/// Shake magnitude below which the offset snaps to exactly zero
pub const SHAKE_EPSILON: f32 = 0.05;

/// Fraction of the legacy color blended into a newborn star's color
pub const LEGACY_BLEND: f32 = 0.18;

/// Ambient brightness gained per violent death (ratchet step)
pub const BRIGHTNESS_STEP: f32 = 0.08;

/// Ambient brightness ceiling
pub const BRIGHTNESS_CAP: f32 = 0.35;

/// Instability above which the star body renders as a noise-displaced polygon
pub const POLYGON_INSTABILITY: f32 = 45.0;

/// Instability above which an irregular noise term joins the pulsation
pub const NOISY_PULSE_INSTABILITY: f32 = 70.0;

/// Mass above which the star gets cross/halo streaks
pub const STREAK_MASS: f32 = 80.0;

/// Vertices of the unstable star body polygon
pub const BODY_VERTICES: usize = 24;

/// Concentric glow rings around the star body
pub const GLOW_RINGS: usize = 4;

/// Frames between shed bursts during a nebula death
pub const NEBULA_SHED_INTERVAL: u32 = 30;
