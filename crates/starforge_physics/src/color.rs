use starforge_core::constants::LEGACY_BLEND;
use starforge_core::Rgb;

// Anchor colors keyed by mass fraction: low-mass stars run cool and red,
// mid-mass white-gold, high-mass blue-white.
const ANCHOR_LOW: Rgb = Rgb::new(255.0, 96.0, 64.0);
const ANCHOR_MID: Rgb = Rgb::new(255.0, 236.0, 200.0);
const ANCHOR_HIGH: Rgb = Rgb::new(170.0, 200.0, 255.0);

/// Derive a star's color from its mass, blending a fixed fraction toward
/// the legacy color of the previously deceased star when one exists.
///
/// Piecewise linear across the anchors; masses outside [0, 100]
/// extrapolate along the nearest segment rather than failing.
pub fn star_color(mass: f32, legacy: Option<Rgb>) -> Rgb {
    let t = mass / 100.0;
    let base = if t < 0.5 {
        ANCHOR_LOW.lerp(ANCHOR_MID, t / 0.5)
    } else {
        ANCHOR_MID.lerp(ANCHOR_HIGH, (t - 0.5) / 0.5)
    };
    match legacy {
        Some(inherited) => base.lerp(inherited, LEGACY_BLEND),
        None => base,
    }
}
