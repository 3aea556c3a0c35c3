use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// Scene phase enum — the screen progression of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenePhase {
    Init,
    SelectPosition,
    SetParameters,
    BigBang,
    StarFormation,
    Observation,
    BlackHoleSink,
    End,
}

impl ScenePhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::SelectPosition => "Select Position",
            Self::SetParameters => "Set Parameters",
            Self::BigBang => "Big Bang",
            Self::StarFormation => "Star Formation",
            Self::Observation => "Observation",
            Self::BlackHoleSink => "Black Hole Sink",
            Self::End => "End",
        }
    }
}

/// Terminal behavior of a star at end-of-life, selected by mass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathBranch {
    Nebula,
    Supernova,
    BlackHole,
}

impl DeathBranch {
    /// Pure function of mass at the instant life reaches zero.
    pub fn from_mass(mass: f32, config: &SimConfig) -> Self {
        if mass > config.black_hole_mass {
            Self::BlackHole
        } else if mass > config.supernova_mass {
            Self::Supernova
        } else {
            Self::Nebula
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Nebula => "Nebula",
            Self::Supernova => "Supernova",
            Self::BlackHole => "Black Hole",
        }
    }

    /// End-of-life message shown on the final screen.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Nebula => {
                "The star exhales its outer layers and settles into a quiet white dwarf."
            }
            Self::Supernova => {
                "The star tears itself apart in a supernova, seeding the void with new elements."
            }
            Self::BlackHole => "The core collapses past the event horizon. A black hole remains.",
        }
    }
}

/// An RGB color with 0-255 channels, the working representation for
/// star and particle colors before they become [0, 1] RGBA draw values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation between two colors. `t` outside [0, 1]
    /// extrapolates, matching the graceful-degradation policy for
    /// out-of-range parameters.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    /// Convert to [0, 1] RGBA with the given 0-255 alpha, clamping
    /// channels that extrapolation may have pushed out of range.
    pub fn rgba(self, alpha: f32) -> [f32; 4] {
        [
            (self.r / 255.0).clamp(0.0, 1.0),
            (self.g / 255.0).clamp(0.0, 1.0),
            (self.b / 255.0).clamp(0.0, 1.0),
            (alpha / 255.0).clamp(0.0, 1.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_death_branch_thresholds() {
        let config = SimConfig::default();
        assert_eq!(DeathBranch::from_mass(95.0, &config), DeathBranch::BlackHole);
        assert_eq!(DeathBranch::from_mass(70.0, &config), DeathBranch::Supernova);
        assert_eq!(DeathBranch::from_mass(20.0, &config), DeathBranch::Nebula);
        // Boundary masses stay on the lower branch.
        assert_eq!(
            DeathBranch::from_mass(config.black_hole_mass, &config),
            DeathBranch::Supernova
        );
        assert_eq!(
            DeathBranch::from_mass(config.supernova_mass, &config),
            DeathBranch::Nebula
        );
    }

    #[test]
    fn test_rgb_lerp_endpoints_and_midpoint() {
        let a = Rgb::new(0.0, 100.0, 200.0);
        let b = Rgb::new(100.0, 200.0, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let mid = a.lerp(b, 0.5);
        assert_eq!(mid, Rgb::new(50.0, 150.0, 100.0));
    }

    #[test]
    fn test_rgba_clamps_extrapolated_channels() {
        let hot = Rgb::new(300.0, -20.0, 128.0);
        let c = hot.rgba(255.0);
        assert_eq!(c[0], 1.0);
        assert_eq!(c[1], 0.0);
        assert_eq!(c[3], 1.0);
    }
}
