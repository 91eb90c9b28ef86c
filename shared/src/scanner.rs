//! Short-range wall probes issued every wall-running tick.

use crate::{
    character::CharacterState,
    types::{CapsuleSpec, Contact, Quat, Vec3, WallRunSide},
};

/// World query service used by the wall runner.
///
/// Implemented by [`crate::StaticQueryWorld`] for Rapier scenes and by test worlds.
pub trait WorldQuery {
    /// Cast a ray from `origin` along unit `direction` and return the closest hit within
    /// `max_distance`.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Contact>;

    /// Move a capsule from `start` by `delta`, stopping/sliding on geometry.
    ///
    /// Returns the new capsule center.
    fn sweep_capsule(
        &self,
        capsule: CapsuleSpec,
        start: Vec3,
        rotation: Quat,
        delta: Vec3,
        dt_seconds: f32,
    ) -> Vec3;
}

/// What the probes found around a wall-running character this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WallScan {
    /// Geometry straight ahead.
    InnerCorner(Contact),
    /// The wall beside the character continues.
    Wall(Contact),
    /// The wall ended; a backward probe from beyond its edge found the face around the corner.
    OuterCorner(Contact),
    /// Nothing within reach.
    Lost,
}

/// Issues the forward, lateral and outer-corner probes.
#[derive(Clone, Copy, Debug)]
pub struct WallScanner {
    /// Probe reach (meters).
    pub search_distance: f32,
}

impl WallScanner {
    #[inline]
    pub fn new(search_distance: f32) -> Self {
        Self { search_distance }
    }

    /// Probe along the character's facing direction.
    #[inline]
    pub fn probe_forward<W: WorldQuery>(&self, world: &W, body: &CharacterState) -> Option<Contact> {
        world.cast_ray(body.translation, body.forward(), self.search_distance)
    }

    /// Probe from the character toward the wall side.
    #[inline]
    pub fn probe_lateral<W: WorldQuery>(
        &self,
        world: &W,
        body: &CharacterState,
        side: WallRunSide,
    ) -> Option<Contact> {
        let toward_wall = side.toward_wall(body.right())?;
        world.cast_ray(body.translation, toward_wall, self.search_distance)
    }

    /// Probe backward from a point offset toward the wall side.
    ///
    /// When the wall beside the character has ended, this finds the face around its edge.
    #[inline]
    pub fn probe_outer_corner<W: WorldQuery>(
        &self,
        world: &W,
        body: &CharacterState,
        side: WallRunSide,
    ) -> Option<Contact> {
        let toward_wall = side.toward_wall(body.right())?;
        let origin = body.translation + toward_wall * self.search_distance;
        world.cast_ray(origin, -body.forward(), self.search_distance)
    }

    /// Run the probes in priority order: forward, lateral, outer corner.
    pub fn scan<W: WorldQuery>(&self, world: &W, body: &CharacterState, side: WallRunSide) -> WallScan {
        if let Some(contact) = self.probe_forward(world, body) {
            return WallScan::InnerCorner(contact);
        }
        if let Some(contact) = self.probe_lateral(world, body, side) {
            return WallScan::Wall(contact);
        }
        if let Some(contact) = self.probe_outer_corner(world, body, side) {
            return WallScan::OuterCorner(contact);
        }
        WallScan::Lost
    }
}

#[cfg(test)]
pub(crate) mod test_world {
    //! Bounded one-sided planes, enough to lay out walls and corners in tests.

    use super::*;
    use crate::types::SurfaceId;

    #[derive(Clone, Copy, Debug)]
    pub struct Panel {
        pub surface: SurfaceId,
        /// Outward unit normal.
        pub normal: Vec3,
        /// Plane offset: normal . x = dist.
        pub dist: f32,
        /// Hits must land inside this box.
        pub min: Vec3,
        pub max: Vec3,
    }

    #[derive(Clone, Debug, Default)]
    pub struct PanelWorld {
        pub panels: Vec<Panel>,
    }

    impl PanelWorld {
        pub fn with(mut self, panel: Panel) -> Self {
            self.panels.push(panel);
            self
        }
    }

    impl WorldQuery for PanelWorld {
        fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Contact> {
            const BOUNDS_EPS: f32 = 1.0e-4;
            let mut best: Option<(f32, Contact)> = None;

            for panel in &self.panels {
                let denom = panel.normal.dot(&direction);
                // Parallel or approaching from behind.
                if denom >= -1.0e-6 {
                    continue;
                }
                let t = (panel.dist - panel.normal.dot(&origin)) / denom;
                if t < 0.0 || t > max_distance {
                    continue;
                }
                let point = origin + direction * t;
                let inside = (0..3).all(|i| {
                    point[i] >= panel.min[i] - BOUNDS_EPS && point[i] <= panel.max[i] + BOUNDS_EPS
                });
                if !inside {
                    continue;
                }
                if best.is_none_or(|(bt, _)| t < bt) {
                    best = Some((
                        t,
                        Contact {
                            surface: panel.surface,
                            point,
                            normal: panel.normal,
                        },
                    ));
                }
            }

            best.map(|(_, contact)| contact)
        }

        fn sweep_capsule(
            &self,
            _capsule: CapsuleSpec,
            start: Vec3,
            _rotation: Quat,
            delta: Vec3,
            _dt_seconds: f32,
        ) -> Vec3 {
            start + delta
        }
    }
}
