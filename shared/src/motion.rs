use std::time::Duration;

use crate::types::{Quat, Vec3};

/// A pose the character is moved to by a [`TimedMotion`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

/// Sample of a timed motion after advancing it.
#[derive(Clone, Copy, Debug)]
pub struct MotionSample {
    pub pose: Pose,
    /// The motion reached its end on this advance.
    pub finished: bool,
}

/// Eased interpolation between two poses over a fixed duration.
///
/// The motion does not own a clock: the owner advances it by each tick's delta and reacts to
/// the `finished` sample (the completion hand-off). Position eases in and out; rotation follows
/// the same eased fraction.
#[derive(Clone, Copy, Debug)]
pub struct TimedMotion {
    from: Pose,
    to: Pose,
    duration_secs: f32,
    elapsed_secs: f32,
}

impl TimedMotion {
    #[inline]
    pub fn new(from: Pose, to: Pose, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration_secs: duration.as_secs_f32(),
            elapsed_secs: 0.0,
        }
    }

    /// Advance by `dt_seconds` and return the pose to apply.
    ///
    /// Once finished, further advances keep returning the end pose.
    pub fn advance(&mut self, dt_seconds: f32) -> MotionSample {
        self.elapsed_secs += dt_seconds.max(0.0);

        if self.duration_secs <= 0.0 || self.elapsed_secs >= self.duration_secs {
            self.elapsed_secs = self.duration_secs.max(0.0);
            return MotionSample {
                pose: self.to,
                finished: true,
            };
        }

        let t = ease_in_out(self.elapsed_secs / self.duration_secs);
        let translation = self.from.translation.lerp(&self.to.translation, t);
        let rotation = self
            .from
            .rotation
            .try_slerp(&self.to.rotation, t, 1.0e-6)
            .unwrap_or(self.to.rotation);

        MotionSample {
            pose: Pose {
                translation,
                rotation,
            },
            finished: false,
        }
    }

    #[inline]
    pub fn target(&self) -> Pose {
        self.to
    }

    /// Fraction of the duration elapsed, in `[0, 1]`.
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.duration_secs <= 0.0 {
            1.0
        } else {
            (self.elapsed_secs / self.duration_secs).clamp(0.0, 1.0)
        }
    }
}

/// Smoothstep: zero slope at both ends.
#[inline]
fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
