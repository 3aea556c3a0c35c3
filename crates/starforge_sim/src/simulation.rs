use starforge_core::{Frame, InputEvent, SimConfig};
use starforge_physics::field::RandomField;

use super::scene::SceneController;
use super::star::StarEvent;
use super::universe::Universe;

/// The whole session in one place: configuration, the frame counter,
/// the randomness source, the scene controller, and the universe.
///
/// One `tick` per rendering frame, fixed-step. `compose_frame` emits the
/// frame's draw list; a headless caller can skip it entirely.
pub struct Simulation {
    pub config: SimConfig,
    pub frame: u64,
    pub field: RandomField,
    pub scene: SceneController,
    pub universe: Universe,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        let mut field = RandomField::new(config.seed);
        let mut universe = Universe::new(config.clone());
        universe.init_background_stars(&mut field);
        universe.init_motes(&mut field);
        Self {
            scene: SceneController::new(config.clone()),
            config,
            frame: 0,
            field,
            universe,
        }
    }

    /// Advance exactly one simulation tick: route input, run the scene
    /// timers, then advance the universe and feed the star's expiry back
    /// into the controller.
    pub fn tick(&mut self, events: &[InputEvent]) {
        self.frame += 1;
        for event in events {
            self.scene
                .handle_input(*event, &mut self.universe, &mut self.field);
        }
        self.scene.tick(&mut self.universe, &mut self.field);
        if let Some(StarEvent::LifeExpired) =
            self.universe
                .advance(self.frame, self.scene.phase, &mut self.field)
        {
            self.scene
                .on_star_expired(&mut self.universe, &mut self.field);
        }
    }

    /// Emit the current frame's draw list.
    pub fn compose_frame(&mut self) -> Frame {
        self.universe
            .compose_frame(self.frame, &self.scene, &mut self.field)
    }
}
