//! Rapier-based query world for immutable level geometry.
//!
//! Both the wall runner and the stock locomotion run their queries against this scene:
//! - ray casts for the wall probes,
//! - capsule sweeps through Rapier's `KinematicCharacterController`,
//! - per-surface wall-run capability lookups.
//!
//! Design goals
//! - Deterministic: statics are inserted sorted by `id`.
//! - Query-only: no dynamics; the broad phase is updated once at build time.
//! - Immutable world: statics do not move after construction.

// Re-export Rapier so the client can name Rapier types without depending on it directly.
pub use rapier3d;

use log::warn;
use rapier3d::{
    control::{CharacterAutostep, CharacterLength, KinematicCharacterController},
    na::{Isometry3, Point3, Translation3},
    parry::utils::hashmap::HashMap,
    prelude::*,
};

use crate::{
    scanner::WorldQuery,
    surface::SurfaceTags,
    types::{CapsuleSpec, Contact, Quat, SurfaceId, Vec3},
};

/// Canonical definition of an immutable level collider.
///
/// Conventions
/// - Units are meters.
/// - Rotation is a unit quaternion.
/// - For planes, the normal is pose-derived: `normal = rotation * +Y`,
///   and `dist = dot(normal, translation) + offset_along_normal`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier; also the surface part id.
    pub id: u32,
    /// Level object this collider belongs to. Wall-run capability is declared per owner.
    pub owner: u32,
    pub translation: Vec3,
    pub rotation: Quat,
    pub shape: ColliderShapeDef,
    /// Whether the owner opts in to wall-running.
    pub wall_runnable: bool,
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space), offset along its pose-derived normal.
    Plane { offset_along_normal: f32 },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vec3 },

    /// Y-aligned cylinder (meters).
    CylinderY { radius: f32, half_height: f32 },
}

impl WorldStaticDef {
    #[inline]
    pub fn surface(&self) -> SurfaceId {
        SurfaceId::new(self.owner, self.id)
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.translation.iter().all(|v| v.is_finite()) {
            return Err("Static translation must be finite");
        }
        if !self.rotation.coords.iter().all(|v| v.is_finite()) {
            return Err("Static rotation must be finite");
        }

        match self.shape {
            ColliderShapeDef::Plane {
                offset_along_normal,
            } if !offset_along_normal.is_finite() => Err("Plane offset must be finite"),
            ColliderShapeDef::Cuboid { half_extents }
                if !half_extents.iter().all(|v| is_positive(*v)) =>
            {
                Err("Cuboid half extents must be finite and positive")
            }
            ColliderShapeDef::CylinderY {
                radius,
                half_height,
            } if !(is_positive(radius) && is_positive(half_height)) => {
                Err("Cylinder dimensions must be finite and positive")
            }
            _ => Ok(()),
        }
    }
}

#[inline]
fn is_positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

/// Build a positioned Rapier collider from a `WorldStaticDef`.
pub fn collider_from_def(def: &WorldStaticDef) -> Collider {
    let iso = Isometry3::from_parts(Translation3::from(def.translation), def.rotation);

    match def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // n . x = dist, with n = R * +Y and dist = n . t + offset.
            let n = def.rotation * Vector::y();
            let dist = n.dot(&def.translation) + offset_along_normal;
            let unit_n = UnitVector::new_normalize(n);

            ColliderBuilder::new(SharedShape::new(HalfSpace::new(unit_n)))
                .translation(unit_n.into_inner() * dist)
                .build()
        }

        ColliderShapeDef::Cuboid { half_extents } => {
            let mut collider =
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build();
            collider.set_position(iso);
            collider
        }

        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => {
            let mut collider = ColliderBuilder::cylinder(half_height, radius).build();
            collider.set_position(iso);
            collider
        }
    }
}

/// In-memory Rapier structures for scene queries and KCC against the static level.
pub struct StaticQueryWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    surfaces: HashMap<ColliderHandle, SurfaceId>,
    wall_runnable: HashMap<u32, bool>,
}

/// Result of moving the character capsule with the stock locomotion controller.
#[derive(Clone, Debug, Default)]
pub struct CharacterMove {
    /// New capsule center.
    pub translation: Vec3,
    pub grounded: bool,
    /// Surfaces touched during the move, one per collider.
    pub hits: Vec<Contact>,
}

impl StaticQueryWorld {
    pub fn as_query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    #[inline]
    pub fn surface_of(&self, handle: ColliderHandle) -> Option<SurfaceId> {
        self.surfaces.get(&handle).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Move the capsule by `desired` with the locomotion controller (autostep, ground snapping)
    /// and report what it touched.
    pub fn move_character(
        &self,
        capsule: CapsuleSpec,
        translation: Vec3,
        rotation: Quat,
        desired: Vec3,
        dt_seconds: f32,
    ) -> CharacterMove {
        let query_pipeline = self.as_query_pipeline(QueryFilter::only_fixed());
        let iso = Isometry3::from_parts(Translation3::from(translation), rotation);

        let mut touched: Vec<(ColliderHandle, Vec3)> = Vec::new();
        let correction = locomotion_controller().move_shape(
            dt_seconds.max(MIN_KCC_DT),
            &query_pipeline,
            &Capsule::new_y(capsule.half_height, capsule.radius),
            &iso,
            desired,
            |collision| {
                if touched.iter().all(|(handle, _)| *handle != collision.handle) {
                    touched.push((collision.handle, collision.hit.normal1.into_inner()));
                }
            },
        );

        let end = translation + correction.translation;
        let reach = capsule.radius * 2.0;
        let hits = touched
            .into_iter()
            .filter_map(|(handle, normal)| {
                let surface = self.surface_of(handle)?;
                // Re-probe for the exact point; fall back to the capsule surface.
                let contact = self
                    .cast_ray(end, -normal, reach)
                    .filter(|contact| contact.surface == surface)
                    .unwrap_or(Contact {
                        surface,
                        point: end - normal * capsule.radius,
                        normal,
                    });
                Some(contact)
            })
            .collect();

        CharacterMove {
            translation: end,
            grounded: correction.grounded,
            hits,
        }
    }
}

const MIN_KCC_DT: f32 = 1.0e-6;

/// Controller used by the stock locomotion: steps over curbs and snaps to the ground.
fn locomotion_controller() -> KinematicCharacterController {
    KinematicCharacterController {
        autostep: Some(CharacterAutostep {
            include_dynamic_bodies: false,
            max_height: CharacterLength::Relative(0.4),
            ..CharacterAutostep::default()
        }),
        offset: CharacterLength::Relative(0.025),
        ..KinematicCharacterController::default()
    }
}

/// Controller used while wall-running: plain slide, no stepping, no ground snapping.
fn wall_controller() -> KinematicCharacterController {
    KinematicCharacterController {
        autostep: None,
        snap_to_ground: None,
        offset: CharacterLength::Relative(0.025),
        ..KinematicCharacterController::default()
    }
}

impl WorldQuery for StaticQueryWorld {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Contact> {
        let query_pipeline = self.as_query_pipeline(QueryFilter::only_fixed());
        let ray = Ray::new(Point3::from(origin), direction);

        let (handle, hit) =
            query_pipeline.cast_ray_and_get_normal(&ray, max_distance.max(0.0), true)?;
        let surface = self.surface_of(handle)?;

        Some(Contact {
            surface,
            point: ray.point_at(hit.time_of_impact).coords,
            normal: hit.normal,
        })
    }

    fn sweep_capsule(
        &self,
        capsule: CapsuleSpec,
        start: Vec3,
        rotation: Quat,
        delta: Vec3,
        dt_seconds: f32,
    ) -> Vec3 {
        let query_pipeline = self.as_query_pipeline(QueryFilter::only_fixed());
        let iso = Isometry3::from_parts(Translation3::from(start), rotation);

        let correction = wall_controller().move_shape(
            dt_seconds.max(MIN_KCC_DT),
            &query_pipeline,
            &Capsule::new_y(capsule.half_height, capsule.radius),
            &iso,
            delta,
            |_| {},
        );

        start + correction.translation
    }
}

impl SurfaceTags for StaticQueryWorld {
    #[inline]
    fn is_wall_runnable(&self, surface: SurfaceId) -> bool {
        self.wall_runnable
            .get(&surface.owner)
            .copied()
            .unwrap_or(false)
    }
}

/// Build the query world. Invalid definitions are skipped with a warning.
pub fn build_static_query_world(
    world_statics: impl IntoIterator<Item = WorldStaticDef>,
    dt: f32,
) -> StaticQueryWorld {
    let mut defs: Vec<WorldStaticDef> = world_statics.into_iter().collect();
    defs.sort_by_key(|d| d.id);

    let bodies = RigidBodySet::new();
    let mut colliders = ColliderSet::new();
    let mut modified_colliders = Vec::new();
    let mut surfaces = HashMap::default();
    let mut wall_runnable: HashMap<u32, bool> = HashMap::default();

    for def in &defs {
        if let Err(reason) = def.validate() {
            warn!("Skipping static {}: {}", def.id, reason);
            continue;
        }

        let co_handle = colliders.insert(collider_from_def(def));
        modified_colliders.push(co_handle);
        surfaces.insert(co_handle, def.surface());
        *wall_runnable.entry(def.owner).or_insert(false) |= def.wall_runnable;
    }

    let mut broad_phase = BroadPhaseBvh::new();
    let mut events = Vec::new();
    broad_phase.update(
        &IntegrationParameters {
            dt,
            ..IntegrationParameters::default()
        },
        &colliders,
        &bodies,
        &modified_colliders,
        &[],
        &mut events,
    );

    StaticQueryWorld {
        bodies,
        colliders,
        broad_phase,
        narrow_phase: NarrowPhase::default(),
        surfaces,
        wall_runnable,
    }
}
