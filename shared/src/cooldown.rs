use std::time::Duration;

/// One-shot deadline on the simulation clock.
///
/// Times are offsets from an arbitrary, monotonically increasing simulation epoch (e.g. Bevy's
/// `Time::elapsed()`). The cooldown is active strictly before the deadline; at the deadline it has
/// elapsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cooldown {
    deadline: Option<Duration>,
}

impl Cooldown {
    /// Arm (or re-arm) the cooldown to expire `duration` after `now`.
    #[inline]
    pub fn start(&mut self, now: Duration, duration: Duration) {
        self.deadline = Some(now.saturating_add(duration));
    }

    #[inline]
    pub fn is_active(&self, now: Duration) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }

    /// Time left until the cooldown elapses (zero when inactive).
    #[inline]
    pub fn remaining(&self, now: Duration) -> Duration {
        self.deadline
            .map(|deadline| deadline.saturating_sub(now))
            .unwrap_or_default()
    }

    #[inline]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}
