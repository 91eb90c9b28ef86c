use std::time::Duration;

/// Speed along the wall while wall-running (meters per second).
pub const WALL_RUN_SPEED_MPS: f32 = 5.5;

/// Rate at which the character's rotation converges on the wall-run frame.
///
/// Convention (interp-to):
/// - each tick moves `clamp(dt * rate, 0, 1)` of the remaining angle
/// - 0.0 or below snaps straight to the target
pub const WALL_RUN_ROTATION_INTERP_SPEED: f32 = 5.0;

/// How long wall-running stays disabled after a run ends.
pub const WALL_RUN_COOLDOWN: Duration = Duration::from_millis(700);

/// Duration of the eased motion that carries the character around a corner.
pub const WALL_RUN_CORNER_TURN_DURATION: Duration = Duration::from_millis(300);

/// Duration of the eased rotation that aligns the character with a newly contacted wall.
pub const WALL_RUN_INITIATION_DURATION: Duration = Duration::from_millis(200);

/// Wall probes reach this many capsule radii from the capsule center.
pub const WALL_SEARCH_RADIUS_SCALE: f32 = 2.0;

/// Largest `|normal . up|` of a surface that still counts as a wall (about 60 degrees of slope).
pub const WALL_MAX_NORMAL_UP_DOT: f32 = 0.5;

/// When set, characters latch onto any wall-runnable surface without an explicit start request.
pub const AUTO_WALL_RUN: bool = true;

/// Ticks shorter than this (seconds) skip the wall-follow step.
pub const MIN_TICK_TIME: f32 = 1.0e-6;

/// Smallest cross-product length accepted when building a wall-run frame.
///
/// Below this the wall normal is (nearly) parallel to the character's up axis, e.g. a floor or
/// ceiling, and there is no meaningful direction along the wall.
pub const FRAME_DEGENERACY_EPS: f32 = 1.0e-3;

/// Practical small distance for comparisons (meters).
pub const DIST_EPS: f32 = 1.0e-6;
