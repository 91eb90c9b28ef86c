//! The playground level: static geometry for rendering and for the query world.

use bevy::prelude::*;
use wallrun::{ColliderShapeDef, StaticQueryWorld, WorldStaticDef, build_static_query_world};

use crate::{
    FIXED_HZ,
    convert::{to_bevy_quat, to_bevy_vec},
};

/// Query world built from the level statics; shared by every character.
#[derive(Resource)]
pub struct LevelWorld(pub StaticQueryWorld);

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, setup);
}

const GROUND_SIZE: f32 = 80.0;

/// Level object ids. Wall-run capability is declared per object.
const GROUND: u32 = 1;
const LONG_WALL: u32 = 2;
const BLOCK: u32 = 3;
const PILLAR: u32 = 4;
const CRATE: u32 = 5;

struct LevelPiece {
    def: WorldStaticDef,
    color: Color,
}

fn piece(
    id: u32,
    owner: u32,
    translation: [f32; 3],
    shape: ColliderShapeDef,
    wall_runnable: bool,
) -> LevelPiece {
    let color = if wall_runnable {
        Color::srgb_u8(124, 144, 255)
    } else {
        Color::srgb_u8(150, 140, 130)
    };

    LevelPiece {
        def: WorldStaticDef {
            id,
            owner,
            translation: translation.into(),
            rotation: wallrun::Quat::identity(),
            shape,
            wall_runnable,
        },
        color,
    }
}

fn cuboid(hx: f32, hy: f32, hz: f32) -> ColliderShapeDef {
    ColliderShapeDef::Cuboid {
        half_extents: wallrun::Vec3::new(hx, hy, hz),
    }
}

/// Ground, a long wall ending in an inner corner, a free-standing block with four outer
/// corners, a round pillar, and a plain crate that cannot be wall-run.
fn level_pieces() -> Vec<LevelPiece> {
    vec![
        piece(
            1,
            GROUND,
            [0.0, 0.0, 0.0],
            ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
            false,
        ),
        // Runnable face at x = -2.5 for z in [-20, 0].
        piece(2, LONG_WALL, [-3.0, 2.5, -10.0], cuboid(0.5, 2.5, 10.0), true),
        // Across the end of the long wall; its face at z = -20 closes the inner corner.
        piece(3, LONG_WALL, [3.0, 2.5, -20.5], cuboid(6.0, 2.5, 0.5), true),
        piece(4, BLOCK, [9.0, 2.0, -8.0], cuboid(2.5, 2.0, 2.5), true),
        piece(
            5,
            PILLAR,
            [-10.0, 3.0, -6.0],
            ColliderShapeDef::CylinderY {
                radius: 1.5,
                half_height: 3.0,
            },
            true,
        ),
        piece(6, CRATE, [5.0, 1.0, 5.0], cuboid(1.5, 1.0, 1.5), false),
    ]
}

fn mesh_for(shape: &ColliderShapeDef) -> Mesh {
    match *shape {
        ColliderShapeDef::Plane { .. } => Plane3d::default()
            .mesh()
            .size(GROUND_SIZE, GROUND_SIZE)
            .build(),
        ColliderShapeDef::Cuboid { half_extents } => {
            Cuboid::new(half_extents.x * 2.0, half_extents.y * 2.0, half_extents.z * 2.0).into()
        }
        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => Cylinder::new(radius, half_height * 2.0).into(),
    }
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let pieces = level_pieces();

    for LevelPiece { def, color } in &pieces {
        commands.spawn((
            Mesh3d(meshes.add(mesh_for(&def.shape))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: *color,
                perceptual_roughness: 1.0,
                metallic: 0.0,
                ..default()
            })),
            Transform::from_translation(to_bevy_vec(def.translation))
                .with_rotation(to_bevy_quat(def.rotation)),
        ));
    }

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 20.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let world = build_static_query_world(
        pieces.into_iter().map(|piece| piece.def),
        (1.0 / FIXED_HZ) as f32,
    );
    info!("Level ready with {} static colliders", world.len());
    commands.insert_resource(LevelWorld(world));
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallrun::{SurfaceId, SurfaceTags};

    #[test]
    fn every_piece_is_valid_and_uniquely_numbered() {
        let pieces = level_pieces();
        let mut ids: Vec<u32> = pieces.iter().map(|p| p.def.id).collect();
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), pieces.len());
        assert!(pieces.iter().all(|p| p.def.validate().is_ok()));
    }

    #[test]
    fn level_has_runnable_and_plain_geometry() {
        let world = build_static_query_world(level_pieces().into_iter().map(|p| p.def), 1.0 / 64.0);

        assert!(world.is_wall_runnable(SurfaceId::new(LONG_WALL, 2)));
        assert!(world.is_wall_runnable(SurfaceId::new(PILLAR, 5)));
        assert!(!world.is_wall_runnable(SurfaceId::new(GROUND, 1)));
        assert!(!world.is_wall_runnable(SurfaceId::new(CRATE, 6)));
    }
}
