use glam::Vec2;
use noise::{NoiseFn, Perlin};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Source of all randomness in the simulation: seeded uniform values and
/// coherent Perlin noise. One seed drives both, so a session is fully
/// deterministic given the same input sequence.
pub struct RandomField {
    rng: ChaCha8Rng,
    noise: Perlin,
}

impl RandomField {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            noise: Perlin::new(seed as u32),
        }
    }

    /// Uniform value in [0, 1)
    pub fn uniform(&mut self) -> f32 {
        self.rng.gen_range(0.0..1.0)
    }

    /// Uniform value in [lo, hi). Degenerate ranges return `lo`.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }

    /// Random offset with each component in [-amount, amount]
    pub fn jitter(&mut self, amount: f32) -> Vec2 {
        Vec2::new(self.range(-amount, amount), self.range(-amount, amount))
    }

    /// Unit vector with uniform random direction
    pub fn unit_vec2(&mut self) -> Vec2 {
        let angle = self.range(0.0, std::f32::consts::TAU);
        Vec2::new(angle.cos(), angle.sin())
    }

    /// Uniform random point in the annulus around `center`
    pub fn vec2_in_annulus(&mut self, center: Vec2, r_min: f32, r_max: f32) -> Vec2 {
        let dir = self.unit_vec2();
        center + dir * self.range(r_min, r_max)
    }

    /// Coherent 1D noise in [0, 1]
    pub fn noise1(&self, x: f64) -> f32 {
        remap(self.noise.get([x, 0.0]))
    }

    /// Coherent 2D noise in [0, 1]
    pub fn noise2(&self, x: f64, y: f64) -> f32 {
        remap(self.noise.get([x, y]))
    }

    /// Coherent 3D noise in [0, 1]
    pub fn noise3(&self, x: f64, y: f64, z: f64) -> f32 {
        remap(self.noise.get([x, y, z]))
    }
}

/// Perlin output is roughly [-1, 1]; map to [0, 1] and clamp the tails.
fn remap(v: f64) -> f32 {
    ((v as f32) * 0.5 + 0.5).clamp(0.0, 1.0)
}
