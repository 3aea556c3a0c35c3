//! Draw-command rendering.
//!
//! The simulation emits an ordered [`DrawCmd`] list each frame; this
//! module realizes it with pooled `Mesh2d` entities. Fills and rects use
//! shared unit meshes scaled per slot, polygons rebuild a per-slot
//! triangle-fan mesh, and strokes/lines go through gizmos. Each slot owns
//! its `ColorMaterial` so per-command alpha can be written every frame;
//! unused slots are hidden rather than despawned.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::sprite::AlphaMode2d;
use starforge_core::DrawCmd;
use starforge_sim::pipeline::SimState;

/// Shared unit meshes for pooled slots.
#[derive(Resource)]
pub struct DrawAssets {
    pub circle: Handle<Mesh>,
    pub quad: Handle<Mesh>,
}

/// One pooled render entity and its private material.
struct Slot {
    entity: Entity,
    material: Handle<ColorMaterial>,
}

/// Polygon slots additionally own a rebuildable mesh.
struct PolySlot {
    entity: Entity,
    material: Handle<ColorMaterial>,
    mesh: Handle<Mesh>,
}

/// Entity pools, grown on demand and reused every frame.
#[derive(Resource, Default)]
pub struct SlotPools {
    discs: Vec<Slot>,
    quads: Vec<Slot>,
    polys: Vec<PolySlot>,
}

pub fn setup_draw_assets(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    commands.insert_resource(DrawAssets {
        circle: meshes.add(Circle::new(0.5)),
        quad: meshes.add(Rectangle::new(1.0, 1.0)),
    });
    commands.insert_resource(SlotPools::default());
}

fn srgba(color: [f32; 4]) -> Color {
    Color::srgba(color[0], color[1], color[2], color[3])
}

fn blend_material(color: [f32; 4]) -> ColorMaterial {
    ColorMaterial {
        color: srgba(color),
        alpha_mode: AlphaMode2d::Blend,
        ..default()
    }
}

/// Render the current frame's command list. List index becomes depth, so
/// the vec order is the layering order.
pub fn draw_frame_system(
    mut commands: Commands,
    mut sim: ResMut<SimState>,
    assets: Res<DrawAssets>,
    mut pools: ResMut<SlotPools>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut slot_query: Query<(&mut Transform, &mut Visibility)>,
    mut gizmos: Gizmos,
) {
    let frame = sim.0.compose_frame();
    let shake = frame.shake;
    let (width, height) = (sim.0.config.width, sim.0.config.height);

    let mut used_discs = 0;
    let mut used_quads = 0;
    let mut used_polys = 0;

    for (idx, cmd) in frame.cmds.iter().enumerate() {
        let z = 1.0 + idx as f32 * 0.01;
        match cmd {
            DrawCmd::CircleFill {
                center,
                radius,
                color,
            } => {
                let transform = Transform::from_translation((*center + shake).extend(z))
                    .with_scale(Vec3::splat((radius * 2.0).max(0.01)));
                let slot = acquire_slot(
                    &mut commands,
                    &mut pools.discs,
                    &mut used_discs,
                    assets.circle.clone(),
                    transform,
                    *color,
                    &mut materials,
                );
                if let Some((entity, material)) = slot {
                    refresh_slot(
                        entity,
                        &material,
                        transform,
                        *color,
                        &mut materials,
                        &mut slot_query,
                    );
                }
            }
            DrawCmd::Rect { min, max, color } => {
                let size = *max - *min;
                let center = (*min + *max) * 0.5 + shake;
                let transform = Transform::from_translation(center.extend(z))
                    .with_scale(Vec3::new(size.x.max(0.01), size.y.max(0.01), 1.0));
                let slot = acquire_slot(
                    &mut commands,
                    &mut pools.quads,
                    &mut used_quads,
                    assets.quad.clone(),
                    transform,
                    *color,
                    &mut materials,
                );
                if let Some((entity, material)) = slot {
                    refresh_slot(
                        entity,
                        &material,
                        transform,
                        *color,
                        &mut materials,
                        &mut slot_query,
                    );
                }
            }
            DrawCmd::Overlay { color } => {
                // Full-screen wash: unaffected by shake, always on top of
                // everything that came before it in the list.
                let center = Vec2::new(width * 0.5, height * 0.5);
                let transform = Transform::from_translation(center.extend(z))
                    .with_scale(Vec3::new(width, height, 1.0));
                let slot = acquire_slot(
                    &mut commands,
                    &mut pools.quads,
                    &mut used_quads,
                    assets.quad.clone(),
                    transform,
                    *color,
                    &mut materials,
                );
                if let Some((entity, material)) = slot {
                    refresh_slot(
                        entity,
                        &material,
                        transform,
                        *color,
                        &mut materials,
                        &mut slot_query,
                    );
                }
            }
            DrawCmd::Polygon { points, color } => {
                let transform = Transform::from_translation(shake.extend(z));
                let mesh = fan_mesh(points);
                if used_polys < pools.polys.len() {
                    let slot = &pools.polys[used_polys];
                    meshes.insert(&slot.mesh, mesh);
                    refresh_slot(
                        slot.entity,
                        &slot.material,
                        transform,
                        *color,
                        &mut materials,
                        &mut slot_query,
                    );
                } else {
                    let mesh_handle = meshes.add(mesh);
                    let material = materials.add(blend_material(*color));
                    let entity = commands
                        .spawn((
                            Mesh2d(mesh_handle.clone()),
                            MeshMaterial2d(material.clone()),
                            transform,
                            Visibility::Visible,
                        ))
                        .id();
                    pools.polys.push(PolySlot {
                        entity,
                        material,
                        mesh: mesh_handle,
                    });
                }
                used_polys += 1;
            }
            DrawCmd::CircleStroke {
                center,
                radius,
                color,
            } => {
                gizmos.circle_2d(
                    Isometry2d::from_translation(*center + shake),
                    *radius,
                    srgba(*color),
                );
            }
            DrawCmd::Line { from, to, color } => {
                gizmos.line_2d(*from + shake, *to + shake, srgba(*color));
            }
        }
    }

    hide_unused(pools.discs.iter().skip(used_discs), &mut slot_query);
    hide_unused(pools.quads.iter().skip(used_quads), &mut slot_query);
    for slot in pools.polys.iter().skip(used_polys) {
        if let Ok((_, mut visibility)) = slot_query.get_mut(slot.entity) {
            *visibility = Visibility::Hidden;
        }
    }
}

/// Take the next pooled slot, or spawn a fresh entity when the pool is
/// exhausted. Returns the existing slot's parts for refresh, or `None`
/// when a new entity was spawned (it already carries its final state).
fn acquire_slot(
    commands: &mut Commands,
    pool: &mut Vec<Slot>,
    used: &mut usize,
    mesh: Handle<Mesh>,
    transform: Transform,
    color: [f32; 4],
    materials: &mut Assets<ColorMaterial>,
) -> Option<(Entity, Handle<ColorMaterial>)> {
    let slot = if *used < pool.len() {
        let slot = &pool[*used];
        Some((slot.entity, slot.material.clone()))
    } else {
        let material = materials.add(blend_material(color));
        let entity = commands
            .spawn((
                Mesh2d(mesh),
                MeshMaterial2d(material.clone()),
                transform,
                Visibility::Visible,
            ))
            .id();
        pool.push(Slot { entity, material });
        None
    };
    *used += 1;
    slot
}

fn refresh_slot(
    entity: Entity,
    material: &Handle<ColorMaterial>,
    transform: Transform,
    color: [f32; 4],
    materials: &mut Assets<ColorMaterial>,
    slot_query: &mut Query<(&mut Transform, &mut Visibility)>,
) {
    if let Some(mat) = materials.get_mut(material) {
        mat.color = srgba(color);
    }
    if let Ok((mut slot_transform, mut visibility)) = slot_query.get_mut(entity) {
        *slot_transform = transform;
        *visibility = Visibility::Visible;
    }
}

fn hide_unused<'a>(
    slots: impl Iterator<Item = &'a Slot>,
    slot_query: &mut Query<(&mut Transform, &mut Visibility)>,
) {
    for slot in slots {
        if let Ok((_, mut visibility)) = slot_query.get_mut(slot.entity) {
            *visibility = Visibility::Hidden;
        }
    }
}

/// Build a filled polygon mesh as a triangle fan around the centroid.
fn fan_mesh(points: &[Vec2]) -> Mesh {
    let n = points.len();
    let centroid = points.iter().copied().sum::<Vec2>() / n.max(1) as f32;

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(n + 1);

    positions.push([centroid.x, centroid.y, 0.0]);
    normals.push([0.0, 0.0, 1.0]);
    uvs.push([0.5, 0.5]);
    for p in points {
        positions.push([p.x, p.y, 0.0]);
        normals.push([0.0, 0.0, 1.0]);
        uvs.push([0.5, 0.5]);
    }

    let mut indices: Vec<u32> = Vec::with_capacity(n * 3);
    for i in 0..n as u32 {
        let v1 = i + 1;
        let v2 = (i + 1) % n as u32 + 1;
        indices.extend_from_slice(&[0, v1, v2]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
