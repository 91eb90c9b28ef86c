//! Surface classification: which geometry can be wall-run and whether a run may start.

use crate::types::{MovementMode, SurfaceId};

/// Capability lookup for level geometry.
///
/// Any level object can opt in to wall-running by being reported here; the check is independent
/// of what kind of object it is. The capability is declared per owner, so every part of an owner
/// shares it.
pub trait SurfaceTags {
    fn is_wall_runnable(&self, surface: SurfaceId) -> bool;
}

impl<F> SurfaceTags for F
where
    F: Fn(SurfaceId) -> bool,
{
    #[inline]
    fn is_wall_runnable(&self, surface: SurfaceId) -> bool {
        self(surface)
    }
}

/// Remembers the last surface that failed classification.
///
/// A sustained contact reports the same surface many times per second; remembering it skips the
/// capability lookup. Only one surface is kept; rejecting another one replaces it.
#[derive(Clone, Copy, Debug, Default)]
pub struct RejectionCache {
    last: Option<SurfaceId>,
}

impl RejectionCache {
    #[inline]
    pub fn contains(&self, surface: SurfaceId) -> bool {
        self.last == Some(surface)
    }

    #[inline]
    pub fn remember(&mut self, surface: SurfaceId) {
        self.last = Some(surface);
    }

    #[inline]
    pub fn forget(&mut self) {
        self.last = None;
    }

    #[inline]
    pub fn last(&self) -> Option<SurfaceId> {
        self.last
    }
}

/// Whether a character in `mode` may start a wall run.
///
/// - must be airborne under the stock controller (not walking, not already wall-running)
/// - must either auto wall-run or have requested a run
/// - the cooldown must have elapsed
#[inline]
pub fn can_start_wall_run(
    mode: MovementMode,
    auto_wall_run: bool,
    wants_to_wall_run: bool,
    cooldown_active: bool,
) -> bool {
    (auto_wall_run || wants_to_wall_run) && mode == MovementMode::Falling && !cooldown_active
}
