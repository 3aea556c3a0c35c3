use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use starforge_core::{InputEvent, ScenePhase};
use starforge_sim::pipeline::{InputQueue, SimState};

/// Marker for the HUD text (top left)
#[derive(Component)]
pub struct HudText;

/// Marker for the centered screen text (titles, prompts, end message)
#[derive(Component)]
pub struct CenterText;

/// Locally tracked slider values, mirrored into the simulation whenever
/// they change.
#[derive(Resource)]
pub struct ParamState {
    pub mass: f32,
    pub instability: f32,
}

impl Default for ParamState {
    fn default() -> Self {
        Self {
            mass: 50.0,
            instability: 50.0,
        }
    }
}

/// HUD frame counter for throttling
#[derive(Resource, Default)]
pub struct HudThrottle {
    pub frame: u32,
}

/// Spawn the HUD overlay and the centered text panel
pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Text::new("Starforge"),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgba(0.75, 0.85, 1.0, 0.9)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        HudText,
    ));

    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(36.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::srgba(0.9, 0.94, 1.0, 0.95)),
                CenterText,
            ));
        });
}

fn slider_bar(value: f32) -> String {
    let filled = (value / 10.0).round().clamp(0.0, 10.0) as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(10 - filled))
}

/// Update both text panels every 5th frame (string formatting is not free)
pub fn update_hud(
    sim: Res<SimState>,
    params: Res<ParamState>,
    mut throttle: ResMut<HudThrottle>,
    mut hud_query: Query<&mut Text, (With<HudText>, Without<CenterText>)>,
    mut center_query: Query<&mut Text, (With<CenterText>, Without<HudText>)>,
) {
    throttle.frame = throttle.frame.wrapping_add(1);
    if throttle.frame % 5 != 0 {
        return;
    }

    let simulation = &sim.0;
    let scene = &simulation.scene;
    let universe = &simulation.universe;

    if let Ok(mut text) = hud_query.get_single_mut() {
        let star_line = match &universe.star {
            Some(star) => format!(
                "Star: mass {:.0} | instability {:.0} | life {:.0}",
                star.mass,
                star.instability,
                star.life.max(0.0)
            ),
            None => "Star: —".to_string(),
        };
        **text = format!(
            "STARFORGE | {}\n{}\nRemnants: {} | Particles: {}\n",
            scene.phase.name(),
            star_line,
            universe.remnants.len(),
            universe.dust.len() + universe.effects.len(),
        );
    }

    if let Ok(mut text) = center_query.get_single_mut() {
        **text = match scene.phase {
            ScenePhase::Init => {
                "S T A R F O R G E\n\nPress Enter to shape a new star".to_string()
            }
            ScenePhase::SelectPosition => "Choose a point in the void, then click".to_string(),
            ScenePhase::SetParameters => format!(
                "Mass        {}  {:>3.0}\nInstability {}  {:>3.0}\n\n\
                 [Left/Right] mass   [Down/Up] instability   [Enter] ignite",
                slider_bar(params.mass),
                params.mass,
                slider_bar(params.instability),
                params.instability,
            ),
            ScenePhase::End if scene.message_visible() => {
                format!(
                    "{}\n\nPress R to witness another star",
                    scene.end_message.unwrap_or_default()
                )
            }
            _ => String::new(),
        };
    }
}

/// Track the cursor in world space and forward clicks
pub fn pointer_input_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut queue: ResMut<InputQueue>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok(world) = camera.viewport_to_world_2d(camera_transform, cursor) else {
        return;
    };

    queue.0.push(InputEvent::PointerMoved(world));
    if buttons.just_pressed(MouseButton::Left) {
        queue.0.push(InputEvent::PointerClick(world));
    }
}

/// Keyboard input: parameter sliders, confirm, restart
pub fn keyboard_input_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    sim: Res<SimState>,
    mut params: ResMut<ParamState>,
    mut queue: ResMut<InputQueue>,
) {
    if keyboard.just_pressed(KeyCode::Enter) {
        queue.0.push(InputEvent::Confirm);
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        queue.0.push(InputEvent::Restart);
    }

    if sim.0.scene.phase != ScenePhase::SetParameters {
        return;
    }

    let step = 0.8;
    let mut changed = false;
    if keyboard.pressed(KeyCode::ArrowRight) {
        params.mass = (params.mass + step).min(100.0);
        changed = true;
    }
    if keyboard.pressed(KeyCode::ArrowLeft) {
        params.mass = (params.mass - step).max(0.0);
        changed = true;
    }
    if keyboard.pressed(KeyCode::ArrowUp) {
        params.instability = (params.instability + step).min(100.0);
        changed = true;
    }
    if keyboard.pressed(KeyCode::ArrowDown) {
        params.instability = (params.instability - step).max(0.0);
        changed = true;
    }
    if changed {
        queue.0.push(InputEvent::SetParameters {
            mass: params.mass,
            instability: params.instability,
        });
    }
}

/// Crosshair at the pointer while choosing the star position
pub fn crosshair_system(sim: Res<SimState>, mut gizmos: Gizmos) {
    let scene = &sim.0.scene;
    if scene.phase != ScenePhase::SelectPosition {
        return;
    }

    let draw_cross = |gizmos: &mut Gizmos, at: Vec2, color: Color| {
        gizmos.circle_2d(Isometry2d::from_translation(at), 14.0, color);
        gizmos.line_2d(at - Vec2::X * 22.0, at + Vec2::X * 22.0, color);
        gizmos.line_2d(at - Vec2::Y * 22.0, at + Vec2::Y * 22.0, color);
    };

    draw_cross(&mut gizmos, scene.pointer, Color::srgba(0.8, 0.9, 1.0, 0.6));
    if let Some(locked) = scene.pending_position {
        draw_cross(&mut gizmos, locked, Color::srgba(1.0, 0.95, 0.7, 0.95));
    }
}
