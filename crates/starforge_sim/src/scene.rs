use bevy::log::info;
use glam::Vec2;
use starforge_core::{DeathBranch, InputEvent, ScenePhase, SimConfig};
use starforge_physics::field::RandomField;

use super::star::Star;
use super::universe::Universe;

/// The top-level finite-state machine driving the session's screens.
///
/// All deferred transitions are countdown fields checked each tick, so
/// they are cancellable and cannot re-enter: the click handoff is armed
/// once by the one-shot `pending_position` guard, and every timer is
/// reset on phase entry before the new phase takes effect.
pub struct SceneController {
    config: SimConfig,
    pub phase: ScenePhase,
    /// Last known pointer position (crosshair tracking)
    pub pointer: Vec2,
    /// Captured star position; also the one-shot guard for the click
    pub pending_position: Option<Vec2>,
    pub mass: f32,
    pub instability: f32,
    handoff_timer: u32,
    flash_timer: u32,
    flash_total: u32,
    formation_timer: u32,
    /// Sink darkening accumulator in [0, 1]
    pub sink_fade: f32,
    end_reveal_timer: u32,
    pub end_message: Option<&'static str>,
}

impl SceneController {
    pub fn new(config: SimConfig) -> Self {
        let pointer = config.center();
        Self {
            config,
            phase: ScenePhase::Init,
            pointer,
            pending_position: None,
            mass: 50.0,
            instability: 50.0,
            handoff_timer: 0,
            flash_timer: 0,
            flash_total: 0,
            formation_timer: 0,
            sink_fade: 0.0,
            end_reveal_timer: 0,
            end_message: None,
        }
    }

    fn set_phase(&mut self, next: ScenePhase) {
        if next != self.phase {
            info!(
                "Scene phase transition: {} -> {}",
                self.phase.name(),
                next.name()
            );
            self.phase = next;
        }
    }

    /// Route one input event. Events that do not apply to the current
    /// phase are ignored.
    pub fn handle_input(
        &mut self,
        event: InputEvent,
        universe: &mut Universe,
        field: &mut RandomField,
    ) {
        match (self.phase, event) {
            (_, InputEvent::PointerMoved(p)) => self.pointer = p,
            (ScenePhase::Init, InputEvent::Confirm) => {
                self.set_phase(ScenePhase::SelectPosition);
            }
            (ScenePhase::SelectPosition, InputEvent::PointerClick(p)) => {
                // One-shot: further clicks during the handoff are ignored.
                if self.pending_position.is_none() {
                    self.pending_position = Some(p);
                    self.handoff_timer = self.config.select_handoff_frames;
                }
            }
            (ScenePhase::SetParameters, InputEvent::SetParameters { mass, instability }) => {
                self.mass = mass;
                self.instability = instability;
            }
            (ScenePhase::SetParameters, InputEvent::Confirm) => {
                self.enter_big_bang(universe, field);
            }
            (ScenePhase::End, InputEvent::Restart) => {
                self.enter_init(universe, field);
            }
            _ => {}
        }
    }

    /// Advance phase timers and perform the due auto-transitions.
    pub fn tick(&mut self, universe: &mut Universe, field: &mut RandomField) {
        match self.phase {
            ScenePhase::SelectPosition => {
                if self.pending_position.is_some() && self.handoff_timer > 0 {
                    self.handoff_timer -= 1;
                    if self.handoff_timer == 0 {
                        self.set_phase(ScenePhase::SetParameters);
                    }
                }
            }
            ScenePhase::BigBang => {
                if self.flash_timer > 0 {
                    self.flash_timer -= 1;
                }
                if self.flash_timer == 0 {
                    self.formation_timer = self.config.formation_frames;
                    self.set_phase(ScenePhase::StarFormation);
                }
            }
            ScenePhase::StarFormation => {
                if self.formation_timer > 0 {
                    self.formation_timer -= 1;
                }
                if self.formation_timer == 0 {
                    self.set_phase(ScenePhase::Observation);
                }
            }
            ScenePhase::BlackHoleSink => {
                self.sink_fade += 1.0 / self.config.sink_fade_frames.max(1) as f32;
                if self.sink_fade >= 1.0 {
                    self.sink_fade = 1.0;
                    self.enter_end(universe, field);
                }
            }
            ScenePhase::End => {
                if self.end_reveal_timer > 0 {
                    self.end_reveal_timer -= 1;
                }
                // Let the sink darkness lift to reveal the remnant field.
                self.sink_fade = (self.sink_fade - 0.01).max(0.0);
            }
            _ => {}
        }
    }

    /// The star died during observation.
    pub fn on_star_expired(&mut self, universe: &mut Universe, field: &mut RandomField) {
        self.enter_end(universe, field);
    }

    /// Construct the star and kick off the Big Bang. This is the only
    /// path into BigBang, so every later phase is guaranteed a star.
    fn enter_big_bang(&mut self, universe: &mut Universe, field: &mut RandomField) {
        let pos = self.pending_position.unwrap_or(self.config.center());
        let star = Star::new(
            pos,
            self.mass,
            self.instability,
            universe.legacy_color,
            &self.config,
        );
        let color = star.color;
        info!(
            "Star ignited at ({:.0}, {:.0}): mass {:.1}, instability {:.1}",
            pos.x, pos.y, self.mass, self.instability
        );
        universe.star = Some(star);
        universe.init_dust(pos, field);
        universe.explode(pos, self.mass, color, field);
        universe.shake(10.0);
        self.flash_timer = self.config.bigbang_flash_frames;
        self.flash_total = self.config.bigbang_flash_frames;
        self.set_phase(ScenePhase::BigBang);
    }

    /// Enter End, resolving the death branch if it has not been resolved
    /// yet. A black-hole resolution detours through BlackHoleSink and
    /// comes back here when the fade completes (resolution is then a
    /// no-op).
    fn enter_end(&mut self, universe: &mut Universe, field: &mut RandomField) {
        self.end_reveal_timer = self.config.end_reveal_frames;
        let newly_resolved = universe.resolve_death(field);
        self.end_message = universe
            .star
            .as_ref()
            .and_then(|s| s.branch)
            .map(|b| b.message());
        if newly_resolved == Some(DeathBranch::BlackHole) {
            self.sink_fade = 0.0;
            self.set_phase(ScenePhase::BlackHoleSink);
        } else {
            self.set_phase(ScenePhase::End);
        }
    }

    /// Back to the start screen. Transient state is cleared; remnants and
    /// the legacy record persist into the next generation.
    fn enter_init(&mut self, universe: &mut Universe, field: &mut RandomField) {
        universe.reset_transients(field);
        self.pending_position = None;
        self.handoff_timer = 0;
        self.flash_timer = 0;
        self.flash_total = 0;
        self.formation_timer = 0;
        self.sink_fade = 0.0;
        self.end_reveal_timer = 0;
        self.end_message = None;
        self.set_phase(ScenePhase::Init);
    }

    /// Big-bang flash overlay alpha, fading linearly over its duration.
    pub fn bigbang_flash_alpha(&self) -> f32 {
        if self.phase != ScenePhase::BigBang || self.flash_total == 0 {
            return 0.0;
        }
        self.flash_timer as f32 / self.flash_total as f32
    }

    /// Sink darkening overlay alpha.
    pub fn sink_overlay_alpha(&self) -> f32 {
        self.sink_fade * 0.9
    }

    /// The end message is revealed after a short delay on the End screen.
    pub fn message_visible(&self) -> bool {
        self.phase == ScenePhase::End && self.end_reveal_timer == 0 && self.end_message.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (SceneController, Universe, RandomField) {
        let config = SimConfig::default();
        (
            SceneController::new(config.clone()),
            Universe::new(config),
            RandomField::new(11),
        )
    }

    #[test]
    fn test_click_handoff_is_one_shot() {
        let (mut scene, mut universe, mut field) = setup();
        scene.handle_input(InputEvent::Confirm, &mut universe, &mut field);
        assert_eq!(scene.phase, ScenePhase::SelectPosition);

        scene.handle_input(
            InputEvent::PointerClick(Vec2::new(100.0, 100.0)),
            &mut universe,
            &mut field,
        );
        let armed = scene.handoff_timer;
        // Run part of the delay down, then click again: the second click
        // must neither re-arm the timer nor move the position.
        for _ in 0..10 {
            scene.tick(&mut universe, &mut field);
        }
        scene.handle_input(
            InputEvent::PointerClick(Vec2::new(900.0, 50.0)),
            &mut universe,
            &mut field,
        );
        assert_eq!(scene.pending_position, Some(Vec2::new(100.0, 100.0)));
        assert_eq!(scene.handoff_timer, armed - 10);
    }

    #[test]
    fn test_handoff_timer_reaches_parameter_screen() {
        let (mut scene, mut universe, mut field) = setup();
        scene.handle_input(InputEvent::Confirm, &mut universe, &mut field);
        scene.handle_input(
            InputEvent::PointerClick(Vec2::new(300.0, 200.0)),
            &mut universe,
            &mut field,
        );
        for _ in 0..scene.config.select_handoff_frames {
            scene.tick(&mut universe, &mut field);
        }
        assert_eq!(scene.phase, ScenePhase::SetParameters);
    }

    #[test]
    fn test_big_bang_only_after_star_construction() {
        let (mut scene, mut universe, mut field) = setup();
        scene.handle_input(InputEvent::Confirm, &mut universe, &mut field);
        scene.handle_input(
            InputEvent::PointerClick(Vec2::new(300.0, 200.0)),
            &mut universe,
            &mut field,
        );
        for _ in 0..scene.config.select_handoff_frames {
            scene.tick(&mut universe, &mut field);
        }
        scene.handle_input(
            InputEvent::SetParameters {
                mass: 80.0,
                instability: 20.0,
            },
            &mut universe,
            &mut field,
        );
        scene.handle_input(InputEvent::Confirm, &mut universe, &mut field);
        assert_eq!(scene.phase, ScenePhase::BigBang);
        assert!(universe.star.is_some(), "BigBang requires a constructed star");
        assert!(!universe.dust.is_empty(), "dust populated at Big Bang");
        assert!(universe.shake > 0.0);
    }

    #[test]
    fn test_flash_fades_linearly_then_formation() {
        let (mut scene, mut universe, mut field) = setup();
        scene.handle_input(InputEvent::Confirm, &mut universe, &mut field);
        scene.handle_input(
            InputEvent::PointerClick(Vec2::new(300.0, 200.0)),
            &mut universe,
            &mut field,
        );
        for _ in 0..scene.config.select_handoff_frames {
            scene.tick(&mut universe, &mut field);
        }
        scene.handle_input(InputEvent::Confirm, &mut universe, &mut field);

        let mut prev = scene.bigbang_flash_alpha();
        assert!(prev > 0.9);
        for _ in 0..scene.config.bigbang_flash_frames {
            scene.tick(&mut universe, &mut field);
            let a = scene.bigbang_flash_alpha();
            assert!(a <= prev, "flash alpha must not increase");
            prev = a;
        }
        assert_eq!(scene.phase, ScenePhase::StarFormation);
    }

    #[test]
    fn test_sink_fade_completes_into_end_without_reresolving() {
        let (mut scene, mut universe, mut field) = setup();
        universe.star = Some(Star::new(
            Vec2::new(200.0, 200.0),
            95.0,
            50.0,
            None,
            &scene.config.clone(),
        ));
        scene.enter_end(&mut universe, &mut field);
        assert_eq!(scene.phase, ScenePhase::BlackHoleSink);
        let remnants = universe.remnants.len();

        for _ in 0..=scene.config.sink_fade_frames + 1 {
            scene.tick(&mut universe, &mut field);
        }
        assert_eq!(scene.phase, ScenePhase::End);
        assert_eq!(universe.remnants.len(), remnants, "no double resolution");
        assert_eq!(
            scene.end_message,
            Some(DeathBranch::BlackHole.message())
        );
    }

    #[test]
    fn test_restart_clears_transients_keeps_legacy() {
        let (mut scene, mut universe, mut field) = setup();
        universe.star = Some(Star::new(
            Vec2::new(200.0, 200.0),
            30.0,
            50.0,
            None,
            &scene.config.clone(),
        ));
        scene.enter_end(&mut universe, &mut field);
        assert_eq!(scene.phase, ScenePhase::End);
        let legacy = universe.legacy_color;
        assert!(legacy.is_some());

        scene.handle_input(InputEvent::Restart, &mut universe, &mut field);
        assert_eq!(scene.phase, ScenePhase::Init);
        assert!(universe.star.is_none());
        assert!(universe.effects.is_empty());
        assert_eq!(universe.legacy_color, legacy, "legacy survives restart");
        assert!(!universe.remnants.is_empty(), "remnants survive restart");
    }

    #[test]
    fn test_end_message_revealed_after_delay() {
        let (mut scene, mut universe, mut field) = setup();
        universe.star = Some(Star::new(
            Vec2::new(200.0, 200.0),
            70.0,
            50.0,
            None,
            &scene.config.clone(),
        ));
        scene.enter_end(&mut universe, &mut field);
        assert!(!scene.message_visible());
        for _ in 0..scene.config.end_reveal_frames {
            scene.tick(&mut universe, &mut field);
        }
        assert!(scene.message_visible());
        assert_eq!(scene.end_message, Some(DeathBranch::Supernova.message()));
    }
}
