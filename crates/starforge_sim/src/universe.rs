use bevy::log::info;
use glam::Vec2;
use starforge_core::constants::*;
use starforge_core::{DeathBranch, DrawCmd, Frame, Rgb, ScenePhase, SimConfig};
use starforge_physics::field::RandomField;
use starforge_physics::particle::{Behavior, Particle, StepCtx};

use super::scene::SceneController;
use super::star::{Star, StarEvent};

/// A static backdrop star; position/size/alpha never change after init,
/// only the twinkle modulation applied at draw time.
#[derive(Debug, Clone)]
pub struct BackgroundStar {
    pub pos: Vec2,
    pub size: f32,
    pub alpha: f32,
    pub twinkle_phase: f32,
}

/// Long-lived debris deposited by a death branch. Drifts slowly and
/// fades out over the tail of its countdown.
#[derive(Debug, Clone)]
pub struct Remnant {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: Rgb,
    pub countdown: f32,
}

impl Remnant {
    fn alpha(&self) -> f32 {
        // Full brightness until the last 600 frames, then a linear fade.
        (self.countdown / 600.0).min(1.0) * 150.0
    }
}

/// Persistent bright core left by a quiet nebula death.
#[derive(Debug, Clone)]
pub struct WhiteDwarf {
    pub pos: Vec2,
    pub size: f32,
    pub alpha: f32,
}

/// Collapse visual for the black-hole branch: expands to its final
/// radius, then fades.
#[derive(Debug, Clone)]
pub struct BlackHoleVisual {
    pub pos: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub alpha: f32,
    growing: bool,
}

/// Owns every entity of the simulation: the star, all particle
/// collections, persistent debris, and the cross-generation legacy
/// record. Drives per-frame update and emits the ordered draw list.
pub struct Universe {
    config: SimConfig,
    pub background: Vec<BackgroundStar>,
    pub dust: Vec<Particle>,
    pub effects: Vec<Particle>,
    pub remnants: Vec<Remnant>,
    pub white_dwarf: Option<WhiteDwarf>,
    pub black_hole: Option<BlackHoleVisual>,
    pub star: Option<Star>,
    /// Screen-shake magnitude; decays geometrically, clamps to zero
    pub shake: f32,
    /// Color of the most recently deceased star. Mutated only in
    /// [`Universe::resolve_death`].
    pub legacy_color: Option<Rgb>,
    /// Ambient brightness ratchet: only ever increases, capped
    pub ambient_brightness: f32,
    /// Supernova flash frames remaining
    pub supernova_flash: u32,
    nebula_shed_clock: u32,
}

impl Universe {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            background: Vec::new(),
            dust: Vec::new(),
            effects: Vec::new(),
            remnants: Vec::new(),
            white_dwarf: None,
            black_hole: None,
            star: None,
            shake: 0.0,
            legacy_color: None,
            ambient_brightness: 0.0,
            supernova_flash: 0,
            nebula_shed_clock: 0,
        }
    }

    /// One-time population of the static backdrop starfield.
    pub fn init_background_stars(&mut self, field: &mut RandomField) {
        self.background.clear();
        for _ in 0..self.config.background_star_count {
            self.background.push(BackgroundStar {
                pos: Vec2::new(
                    field.range(0.0, self.config.width),
                    field.range(0.0, self.config.height),
                ),
                size: field.range(0.5, 2.2),
                alpha: field.range(60.0, 200.0),
                twinkle_phase: field.range(0.0, std::f32::consts::TAU),
            });
        }
        info!("Background starfield: {} stars", self.background.len());
    }

    /// Ambient motes drifting on the idle screens. They live in the dust
    /// collection but never decay.
    pub fn init_motes(&mut self, field: &mut RandomField) {
        for _ in 0..self.config.mote_count {
            let base = Vec2::new(
                field.range(0.0, self.config.width),
                field.range(0.0, self.config.height),
            );
            self.dust.push(Particle::new(
                base,
                field.range(0.6, 1.4),
                field.range(40.0, 110.0),
                Rgb::new(200.0, 210.0, 255.0),
                Behavior::Ambient {
                    base,
                    phase: field.range(0.0, std::f32::consts::TAU),
                },
            ));
        }
    }

    /// Dust field in an annulus around the star position, consumed by
    /// the star during formation.
    pub fn init_dust(&mut self, star_pos: Vec2, field: &mut RandomField) {
        for _ in 0..self.config.dust_count {
            let pos = field.vec2_in_annulus(star_pos, 60.0, 280.0);
            let tint = field.range(0.85, 1.0);
            self.dust.push(Particle::new(
                pos,
                field.range(1.0, 2.5),
                field.range(140.0, 255.0),
                Rgb::new(235.0 * tint, 240.0 * tint, 255.0),
                Behavior::Seeking,
            ));
        }
        info!("Dust field: {} particles seeking the star", self.dust.len());
    }

    /// Clear everything tied to the current star generation. The
    /// remnants and the legacy record deliberately survive into the next
    /// generation.
    pub fn reset_transients(&mut self, field: &mut RandomField) {
        self.dust.clear();
        self.effects.clear();
        self.star = None;
        self.white_dwarf = None;
        self.black_hole = None;
        self.shake = 0.0;
        self.supernova_flash = 0;
        self.nebula_shed_clock = 0;
        self.init_motes(field);
    }

    /// Outward burst at the Big Bang: a modest ring of ballistic sparks.
    pub fn explode(&mut self, pos: Vec2, mass: f32, color: Rgb, field: &mut RandomField) {
        let count = (40.0 + mass * 0.6) as usize;
        for _ in 0..count {
            let vel = field.unit_vec2() * field.range(1.0, 6.0);
            let p = Particle::new(
                pos + field.jitter(4.0),
                field.range(1.0, 2.2),
                field.range(180.0, 255.0),
                color,
                Behavior::Explosive {
                    fade: field.range(2.0, 5.0),
                },
            )
            .with_velocity(vel);
            self.effects.push(p);
        }
    }

    /// Supernova burst: count scales linearly with mass, colors sampled
    /// from a small fixed palette plus the star's own color.
    pub fn supernova_burst(&mut self, pos: Vec2, mass: f32, star_color: Rgb, field: &mut RandomField) {
        let palette = [
            Rgb::new(255.0, 210.0, 80.0),
            Rgb::new(255.0, 120.0, 60.0),
            Rgb::new(220.0, 235.0, 255.0),
            star_color,
        ];
        let count = (60.0 + mass * 1.8) as usize;
        for _ in 0..count {
            let color = palette[(field.uniform() * palette.len() as f32) as usize % palette.len()];
            let vel = field.unit_vec2() * field.range(2.0, 9.0);
            let p = Particle::new(
                pos + field.jitter(6.0),
                field.range(1.2, 3.0),
                255.0,
                color,
                Behavior::Explosive {
                    fade: field.range(1.2, 3.2),
                },
            )
            .with_velocity(vel);
            self.effects.push(p);
        }
    }

    /// Black-hole collapse: a ring of particles dragged straight into
    /// the sink, plus a handful of fast sparks aimed inward.
    pub fn gravity_collapse(&mut self, pos: Vec2, color: Rgb, field: &mut RandomField) {
        for _ in 0..90 {
            let spawn = field.vec2_in_annulus(pos, 80.0, 260.0);
            self.effects.push(Particle::new(
                spawn,
                field.range(1.0, 2.4),
                field.range(200.0, 255.0),
                color,
                Behavior::Collapsing,
            ));
        }
        for _ in 0..20 {
            let spawn = field.vec2_in_annulus(pos, 120.0, 300.0);
            let vel = (pos - spawn).normalize_or_zero() * field.range(6.0, 11.0);
            let p = Particle::new(
                spawn,
                field.range(0.8, 1.6),
                255.0,
                Rgb::new(255.0, 245.0, 225.0),
                Behavior::Explosive {
                    fade: field.range(3.0, 6.0),
                },
            )
            .with_velocity(vel);
            self.effects.push(p);
        }
    }

    /// A few slow pastel particles shed by a quietly dying star.
    pub fn nebula_release(&mut self, pos: Vec2, color: Rgb, field: &mut RandomField) {
        let pastel = color.lerp(Rgb::new(255.0, 255.0, 255.0), 0.4);
        for _ in 0..field.range(3.0, 6.0) as usize {
            let vel = field.unit_vec2() * field.range(0.2, 1.0);
            let p = Particle::new(
                pos + field.jitter(8.0),
                field.range(1.5, 3.5),
                field.range(120.0, 200.0),
                pastel,
                Behavior::Explosive {
                    fade: field.range(0.4, 0.9),
                },
            )
            .with_velocity(vel)
            .with_friction(0.985);
            self.effects.push(p);
        }
    }

    /// Deposit long-lived drifting debris at a death site.
    pub fn create_remnant(&mut self, pos: Vec2, color: Rgb, count: usize, field: &mut RandomField) {
        for _ in 0..count {
            self.remnants.push(Remnant {
                pos: pos + field.jitter(30.0),
                vel: field.unit_vec2() * field.range(0.05, 0.3),
                size: field.range(1.0, 3.0),
                color: color.lerp(Rgb::new(255.0, 255.0, 255.0), 0.25),
                countdown: field.range(1800.0, 3000.0),
            });
        }
    }

    /// Kick the screen shake up to at least `amount`.
    pub fn shake(&mut self, amount: f32) {
        self.shake = self.shake.max(amount);
    }

    /// Decide and execute the star's death branch. Runs at most once per
    /// star: later calls are no-ops. Returns the branch on the resolving
    /// call only.
    pub fn resolve_death(&mut self, field: &mut RandomField) -> Option<DeathBranch> {
        let Some(star) = self.star.as_mut() else {
            return None;
        };
        if star.death_resolved {
            return None;
        }
        star.death_resolved = true;

        let branch = DeathBranch::from_mass(star.mass, &self.config);
        star.branch = Some(branch);
        if branch == DeathBranch::Supernova {
            // The body is torn apart by the burst; only the flash,
            // particles, and remnant speak for it from here on.
            star.alpha = 0.0;
        }
        let (pos, mass, color) = (star.pos, star.mass, star.color);
        info!("Star death: mass {:.1} -> {}", mass, branch.name());

        // The only mutation point for the legacy record.
        self.legacy_color = Some(color);

        match branch {
            DeathBranch::BlackHole => {
                let half = self.config.target_size(mass) * 0.5;
                self.black_hole = Some(BlackHoleVisual {
                    pos,
                    radius: half * 0.4,
                    max_radius: half * 2.2,
                    alpha: 255.0,
                    growing: true,
                });
                self.gravity_collapse(pos, color, field);
                self.create_remnant(pos, color, 24, field);
                self.shake(12.0);
                self.ambient_brightness =
                    (self.ambient_brightness + BRIGHTNESS_STEP).min(BRIGHTNESS_CAP);
            }
            DeathBranch::Supernova => {
                self.supernova_burst(pos, mass, color, field);
                self.supernova_flash = self.config.supernova_flash_frames;
                self.create_remnant(pos, color, 24, field);
                self.shake(18.0);
                self.ambient_brightness =
                    (self.ambient_brightness + BRIGHTNESS_STEP).min(BRIGHTNESS_CAP);
            }
            DeathBranch::Nebula => {
                self.create_remnant(pos, color, 12, field);
                self.white_dwarf = Some(WhiteDwarf {
                    pos,
                    size: 4.0,
                    alpha: 255.0,
                });
            }
        }

        Some(branch)
    }

    /// Advance every owned entity by one tick. Returns the star's expiry
    /// event when its life runs out during observation.
    pub fn advance(
        &mut self,
        frame: u64,
        phase: ScenePhase,
        field: &mut RandomField,
    ) -> Option<StarEvent> {
        // Geometric shake decay with a hard zero below the threshold.
        self.shake *= SHAKE_DECAY;
        if self.shake < SHAKE_EPSILON {
            self.shake = 0.0;
        }

        self.supernova_flash = self.supernova_flash.saturating_sub(1);

        for remnant in &mut self.remnants {
            remnant.pos += remnant.vel;
            remnant.countdown -= 1.0;
        }
        self.remnants.retain(|r| r.countdown > 0.0);

        if let Some(wd) = self.white_dwarf.as_mut() {
            wd.alpha -= 0.15;
            if wd.alpha <= 0.0 {
                self.white_dwarf = None;
            }
        }

        if let Some(bh) = self.black_hole.as_mut() {
            if bh.growing {
                bh.radius += 0.8;
                if bh.radius >= bh.max_radius {
                    bh.growing = false;
                }
            } else if phase == ScenePhase::End {
                bh.alpha -= 0.4;
                if bh.alpha <= 0.0 {
                    self.black_hole = None;
                }
            }
        }

        let attractor = self.star.as_ref().map(|s| s.pos);
        let ctx = StepCtx {
            frame,
            phase,
            attractor,
        };
        for p in &mut self.dust {
            p.step(&ctx);
        }
        self.dust.retain(|p| !p.is_expired());
        for p in &mut self.effects {
            p.step(&ctx);
        }
        self.effects.retain(|p| !p.is_expired());

        let mut event = None;
        if let Some(star) = self.star.as_mut() {
            event = star.step(phase);

            // Quiet death: the star keeps shrinking, fading, and shedding
            // after the end screen is reached.
            if phase == ScenePhase::End
                && star.branch == Some(DeathBranch::Nebula)
                && star.alpha > 0.0
            {
                star.size *= 0.993;
                star.alpha = (star.alpha - 0.6).max(0.0);
                self.nebula_shed_clock += 1;
                if self.nebula_shed_clock % NEBULA_SHED_INTERVAL == 0 {
                    let (pos, color) = (star.pos, star.color);
                    self.nebula_release(pos, color, field);
                }
            }
        }
        event
    }

    /// Emit this frame's draw list in the fixed layer order: shake,
    /// background wash, remnants, ambient tint, backdrop stars,
    /// single-instance effects, dust, effect particles, the star, and
    /// finally the full-screen overlays.
    pub fn compose_frame(
        &self,
        frame_no: u64,
        scene: &SceneController,
        field: &mut RandomField,
    ) -> Frame {
        let mut out = Frame::default();
        if self.shake > 0.0 {
            out.shake = field.jitter(self.shake);
        }

        let b = self.ambient_brightness;
        out.push(DrawCmd::Rect {
            min: Vec2::ZERO,
            max: Vec2::new(self.config.width, self.config.height),
            color: [0.02 + b * 0.08, 0.02 + b * 0.06, 0.05 + b * 0.10, 1.0],
        });

        for remnant in &self.remnants {
            out.circle(remnant.pos, remnant.size, remnant.color.rgba(remnant.alpha()));
        }

        // Slow-moving nebular tint blobs, positioned by coherent noise
        // and colored by the legacy record.
        let tint = self.legacy_color.unwrap_or(Rgb::new(90.0, 110.0, 180.0));
        for i in 0..4 {
            let t = frame_no as f64 * 0.0008;
            let x = field.noise2(i as f64 * 7.3, t) * self.config.width;
            let y = field.noise2(i as f64 * 7.3 + 50.0, t + 13.7) * self.config.height;
            out.circle(
                Vec2::new(x, y),
                140.0 + i as f32 * 60.0,
                tint.rgba(8.0 + b * 40.0),
            );
        }

        for bg in &self.background {
            let twinkle = 0.7 + 0.3 * (frame_no as f32 * 0.05 + bg.twinkle_phase).sin();
            let alpha = bg.alpha * twinkle * (1.0 + b);
            out.circle(bg.pos, bg.size, Rgb::new(255.0, 255.0, 255.0).rgba(alpha));
        }

        if let Some(wd) = &self.white_dwarf {
            out.circle(wd.pos, wd.size * 2.5, Rgb::new(220.0, 230.0, 255.0).rgba(wd.alpha * 0.2));
            out.circle(wd.pos, wd.size, Rgb::new(245.0, 248.0, 255.0).rgba(wd.alpha));
        }

        if let Some(bh) = &self.black_hole {
            out.circle(bh.pos, bh.radius * 1.4, Rgb::new(120.0, 80.0, 200.0).rgba(bh.alpha * 0.12));
            out.circle(bh.pos, bh.radius, Rgb::new(5.0, 3.0, 10.0).rgba(bh.alpha));
            out.push(DrawCmd::CircleStroke {
                center: bh.pos,
                radius: bh.radius,
                color: Rgb::new(255.0, 235.0, 200.0).rgba(bh.alpha * 0.7),
            });
        }

        for p in &self.dust {
            p.draw(&mut out);
        }
        for p in &self.effects {
            p.draw(&mut out);
        }

        if let Some(star) = &self.star {
            star.draw(frame_no, scene.phase, field, &mut out);
        }

        let flash = scene.bigbang_flash_alpha();
        if flash > 0.0 {
            out.push(DrawCmd::Overlay {
                color: [1.0, 1.0, 1.0, flash],
            });
        }
        if self.supernova_flash > 0 {
            let a = self.supernova_flash as f32 / self.config.supernova_flash_frames.max(1) as f32;
            out.push(DrawCmd::Overlay {
                color: [1.0, 0.98, 0.92, a],
            });
        }
        let sink = scene.sink_overlay_alpha();
        if sink > 0.0 {
            out.push(DrawCmd::Overlay {
                color: [0.0, 0.0, 0.0, sink],
            });
        }

        out
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe() -> (Universe, RandomField) {
        (Universe::new(SimConfig::default()), RandomField::new(9))
    }

    fn dying_star(universe: &mut Universe, mass: f32) {
        let config = universe.config.clone();
        universe.star = Some(Star::new(
            Vec2::new(200.0, 200.0),
            mass,
            30.0,
            universe.legacy_color,
            &config,
        ));
    }

    #[test]
    fn test_shake_decays_geometrically_and_clamps_to_zero() {
        let (mut u, mut field) = universe();
        u.shake(10.0);
        let mut prev = u.shake;
        let mut reached_zero = false;
        for _ in 0..200 {
            u.advance(0, ScenePhase::Observation, &mut field);
            assert!(u.shake <= prev);
            prev = u.shake;
            if u.shake == 0.0 {
                reached_zero = true;
                break;
            }
        }
        assert!(reached_zero, "shake never clamped to exactly zero");
    }

    #[test]
    fn test_death_resolution_exactly_once() {
        let (mut u, mut field) = universe();
        dying_star(&mut u, 95.0);
        let first = u.resolve_death(&mut field);
        assert_eq!(first, Some(DeathBranch::BlackHole));
        let effects_after_first = u.effects.len();
        let remnants_after_first = u.remnants.len();
        let legacy_after_first = u.legacy_color;

        // Second call must be a complete no-op.
        assert_eq!(u.resolve_death(&mut field), None);
        assert_eq!(u.effects.len(), effects_after_first);
        assert_eq!(u.remnants.len(), remnants_after_first);
        assert_eq!(u.legacy_color, legacy_after_first);
    }

    #[test]
    fn test_legacy_color_set_on_every_branch() {
        for mass in [20.0, 70.0, 95.0] {
            let (mut u, mut field) = universe();
            dying_star(&mut u, mass);
            assert!(u.legacy_color.is_none());
            u.resolve_death(&mut field);
            assert!(u.legacy_color.is_some(), "mass {mass} left no legacy");
        }
    }

    #[test]
    fn test_brightness_ratchet_capped_and_monotonic() {
        let (mut u, mut field) = universe();
        let mut prev = u.ambient_brightness;
        for _ in 0..10 {
            dying_star(&mut u, 70.0);
            u.resolve_death(&mut field);
            assert!(u.ambient_brightness >= prev);
            assert!(u.ambient_brightness <= BRIGHTNESS_CAP + 1e-6);
            prev = u.ambient_brightness;
        }
        assert!((u.ambient_brightness - BRIGHTNESS_CAP).abs() < 1e-6);
    }

    #[test]
    fn test_nebula_death_leaves_white_dwarf_not_flash() {
        let (mut u, mut field) = universe();
        dying_star(&mut u, 20.0);
        u.resolve_death(&mut field);
        assert!(u.white_dwarf.is_some());
        assert_eq!(u.supernova_flash, 0);
        assert!(u.black_hole.is_none());
    }

    #[test]
    fn test_supernova_burst_count_scales_with_mass() {
        let (mut u1, mut f1) = universe();
        u1.supernova_burst(Vec2::ZERO, 60.0, Rgb::new(255.0, 255.0, 255.0), &mut f1);
        let (mut u2, mut f2) = universe();
        u2.supernova_burst(Vec2::ZERO, 85.0, Rgb::new(255.0, 255.0, 255.0), &mut f2);
        assert!(u2.effects.len() > u1.effects.len());
    }

    #[test]
    fn test_expired_effects_swept() {
        let (mut u, mut field) = universe();
        u.explode(Vec2::new(100.0, 100.0), 50.0, Rgb::new(255.0, 200.0, 100.0), &mut field);
        assert!(!u.effects.is_empty());
        for frame in 0..400 {
            u.advance(frame, ScenePhase::Observation, &mut field);
        }
        assert!(u.effects.is_empty(), "faded burst particles must be removed");
    }

    #[test]
    fn test_remnants_expire_by_countdown() {
        let (mut u, mut field) = universe();
        u.create_remnant(Vec2::ZERO, Rgb::new(200.0, 200.0, 200.0), 8, &mut field);
        for r in &mut u.remnants {
            r.countdown = 3.0;
        }
        for frame in 0..5 {
            u.advance(frame, ScenePhase::End, &mut field);
        }
        assert!(u.remnants.is_empty());
    }

    #[test]
    fn test_frame_layer_order() {
        let (mut u, mut field) = universe();
        u.init_background_stars(&mut field);
        let scene = SceneController::new(SimConfig::default());
        let frame = u.compose_frame(0, &scene, &mut field);
        // Background wash is the very first command.
        assert!(matches!(frame.cmds.first(), Some(DrawCmd::Rect { .. })));
        // No overlay present in the idle scene.
        assert!(
            !frame.cmds.iter().any(|c| matches!(c, DrawCmd::Overlay { .. })),
            "no overlay expected while idle"
        );
    }
}
