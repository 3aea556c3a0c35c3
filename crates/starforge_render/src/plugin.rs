use bevy::prelude::*;
use starforge_sim::pipeline::{simulation_tick, SimState};

use super::draw;
use super::ui;

/// Main render plugin: camera, pooled draw layer, HUD, input.
pub struct StarforgeRenderPlugin;

impl Plugin for StarforgeRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ui::ParamState>()
            .init_resource::<ui::HudThrottle>()
            .add_systems(
                Startup,
                (spawn_camera, draw::setup_draw_assets, ui::spawn_hud),
            )
            .add_systems(
                Update,
                (
                    // Input lands in the queue before the tick consumes it;
                    // drawing reads the freshly advanced state.
                    (ui::pointer_input_system, ui::keyboard_input_system)
                        .before(simulation_tick),
                    (
                        draw::draw_frame_system,
                        ui::crosshair_system,
                        ui::update_hud,
                    )
                        .after(simulation_tick),
                ),
            );
    }
}

/// Center the 2D camera on the simulation's canvas.
fn spawn_camera(mut commands: Commands, sim: Res<SimState>) {
    let center = sim.0.config.center();
    commands.spawn((Camera2d, Transform::from_xyz(center.x, center.y, 0.0)));
}
