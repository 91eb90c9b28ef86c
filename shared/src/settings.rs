/*!
Wall-run tuning knobs.

The defaults come from [`crate::constants`]. Keep the constants as sensible defaults and override
per character from game data; call [`WallRunSettings::validate`] at ingestion time.

Notes
- Distances are in meters, speeds in meters per second, durations as `Duration`.
*/

use std::time::Duration;

use crate::constants::{
    AUTO_WALL_RUN, WALL_RUN_COOLDOWN, WALL_RUN_CORNER_TURN_DURATION, WALL_RUN_INITIATION_DURATION,
    WALL_MAX_NORMAL_UP_DOT, WALL_RUN_ROTATION_INTERP_SPEED, WALL_RUN_SPEED_MPS,
    WALL_SEARCH_RADIUS_SCALE,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallRunSettings {
    /// Speed along the wall (m/s).
    pub wall_run_speed: f32,
    /// Interp-to rate used to rotate toward the wall-run frame.
    pub rotation_interp_speed: f32,
    /// Lockout after a run ends. Must be non-zero.
    pub cooldown: Duration,
    /// Duration of a corner turn.
    pub corner_turn_duration: Duration,
    /// Duration of the initial alignment with the wall.
    pub initiation_duration: Duration,
    /// Probe reach in capsule radii.
    pub wall_search_radius_scale: f32,
    /// Steepest-slope test for contacts: largest accepted `|normal . up|`, in `[0, 1)`.
    pub max_wall_normal_up_dot: f32,
    /// Latch onto walls without explicit start/stop requests.
    pub auto_wall_run: bool,
}

impl Default for WallRunSettings {
    fn default() -> Self {
        Self {
            wall_run_speed: WALL_RUN_SPEED_MPS,
            rotation_interp_speed: WALL_RUN_ROTATION_INTERP_SPEED,
            cooldown: WALL_RUN_COOLDOWN,
            corner_turn_duration: WALL_RUN_CORNER_TURN_DURATION,
            initiation_duration: WALL_RUN_INITIATION_DURATION,
            wall_search_radius_scale: WALL_SEARCH_RADIUS_SCALE,
            max_wall_normal_up_dot: WALL_MAX_NORMAL_UP_DOT,
            auto_wall_run: AUTO_WALL_RUN,
        }
    }
}

impl WallRunSettings {
    /// Probe reach for a capsule of the given radius.
    #[inline]
    pub fn wall_search_distance(&self, capsule_radius: f32) -> f32 {
        (capsule_radius * self.wall_search_radius_scale).max(0.0)
    }

    /// Checks that the settings describe a usable wall run.
    ///
    /// Checks:
    /// - speeds and scales are finite and non-negative
    /// - the probe scale is positive
    /// - the wall slope limit excludes floors and ceilings
    /// - the cooldown is non-zero, so an exit always yields a deadline in the future
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.wall_run_speed.is_finite() || self.wall_run_speed < 0.0 {
            return Err("Wall run speed must be finite and non-negative");
        }
        if !self.rotation_interp_speed.is_finite() {
            return Err("Rotation interp speed must be finite");
        }
        if !self.wall_search_radius_scale.is_finite() || self.wall_search_radius_scale <= 0.0 {
            return Err("Wall search radius scale must be finite and positive");
        }
        if !(0.0..1.0).contains(&self.max_wall_normal_up_dot) {
            return Err("Wall normal up-dot limit must be in [0, 1)");
        }
        if self.cooldown.is_zero() {
            return Err("Wall run cooldown must be non-zero");
        }
        Ok(())
    }
}
