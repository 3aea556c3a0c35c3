use bevy::prelude::*;
use starforge_core::InputEvent;

use super::simulation::Simulation;

/// The running simulation, tracked as a Bevy Resource
#[derive(Resource)]
pub struct SimState(pub Simulation);

/// Input events queued by the render layer, drained once per tick
#[derive(Resource, Default)]
pub struct InputQueue(pub Vec<InputEvent>);

/// Bevy plugin for the simulation pipeline
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputQueue>()
            .add_systems(Update, simulation_tick);
    }
}

/// Main simulation tick — drains queued input and advances one frame.
/// Public so the render plugin can order its systems around it.
pub fn simulation_tick(mut sim: ResMut<SimState>, mut queue: ResMut<InputQueue>) {
    let events: Vec<InputEvent> = queue.0.drain(..).collect();
    sim.0.tick(&events);
}
