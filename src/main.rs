use bevy::prelude::*;
use starforge_core::SimConfig;
use starforge_render::plugin::StarforgeRenderPlugin;
use starforge_sim::pipeline::{SimState, SimulationPlugin};
use starforge_sim::simulation::Simulation;

fn main() {
    let config = SimConfig::default();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Starforge — Stellar Lifecycle".into(),
                resolution: (config.width, config.height).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.0, 0.0, 0.02)))
        .insert_resource(SimState(Simulation::new(config)))
        .add_plugins(SimulationPlugin)
        .add_plugins(StarforgeRenderPlugin)
        .run();
}
