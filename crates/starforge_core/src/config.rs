use serde::{Deserialize, Serialize};

/// Simulation configuration.
///
/// All tuning constants live in this one table. Timers are in frames
/// (the simulation is fixed-step at the display rate, not delta-scaled).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Random seed for deterministic simulation
    pub seed: u64,
    /// Canvas width in world units
    pub width: f32,
    /// Canvas height in world units
    pub height: f32,
    /// Static background starfield population
    pub background_star_count: usize,
    /// Dust particles spawned in an annulus at the Big Bang
    pub dust_count: usize,
    /// Ambient motes drifting on the idle screens
    pub mote_count: usize,
    /// Frames spent in StarFormation before observation begins
    pub formation_frames: u32,
    /// Big-bang flash duration (frames)
    pub bigbang_flash_frames: u32,
    /// Supernova flash duration (frames)
    pub supernova_flash_frames: u32,
    /// Black-hole sink darkening duration (frames)
    pub sink_fade_frames: u32,
    /// Delay between the position click and the parameter screen (frames)
    pub select_handoff_frames: u32,
    /// Delay before the end message is revealed (frames)
    pub end_reveal_frames: u32,
    /// Mass above which a dying star collapses into a black hole
    pub black_hole_mass: f32,
    /// Mass above which (and up to `black_hole_mass`) a dying star goes supernova
    pub supernova_mass: f32,
    /// Star lifetime at mass 0 (frames)
    pub life_base: f32,
    /// Additional lifetime per unit mass fraction (frames)
    pub life_span: f32,
    /// Star diameter at mass 0
    pub size_base: f32,
    /// Additional diameter across the mass range
    pub size_span: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            width: 1280.0,
            height: 720.0,
            background_star_count: 220,
            dust_count: 140,
            mote_count: 40,
            formation_frames: 240,
            bigbang_flash_frames: 60,
            supernova_flash_frames: 90,
            sink_fade_frames: 150,
            select_handoff_frames: 30,
            end_reveal_frames: 45,
            black_hole_mass: 88.0,
            supernova_mass: 55.0,
            life_base: 600.0,
            life_span: 800.0,
            size_base: 18.0,
            size_span: 46.0,
        }
    }
}

impl SimConfig {
    /// Target diameter for a star of the given mass (linear in mass,
    /// extrapolates outside [0, 100] rather than failing).
    pub fn target_size(&self, mass: f32) -> f32 {
        self.size_base + self.size_span * (mass / 100.0)
    }

    /// Lifetime in frames for a star of the given mass.
    pub fn life_for_mass(&self, mass: f32) -> f32 {
        self.life_base + self.life_span * (mass / 100.0)
    }

    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_and_life_monotonic_in_mass() {
        let config = SimConfig::default();
        let masses = [0.0, 20.0, 50.0, 70.0, 95.0, 100.0];
        for pair in masses.windows(2) {
            assert!(
                config.target_size(pair[0]) <= config.target_size(pair[1]),
                "size not monotonic between mass {} and {}",
                pair[0],
                pair[1]
            );
            assert!(
                config.life_for_mass(pair[0]) <= config.life_for_mass(pair[1]),
                "life not monotonic between mass {} and {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_life_range_endpoints() {
        let config = SimConfig::default();
        assert_eq!(config.life_for_mass(0.0), 600.0);
        assert_eq!(config.life_for_mass(100.0), 1400.0);
    }

    #[test]
    fn test_out_of_range_mass_extrapolates() {
        let config = SimConfig::default();
        // Degrade gracefully: the same linear map, no clamping or panic.
        assert!(config.target_size(120.0) > config.target_size(100.0));
        assert!(config.life_for_mass(-10.0) < config.life_for_mass(0.0));
    }
}
