/*!
Core wall-run types and math aliases shared by the wall-run submodules.

This module intentionally contains no algorithms. It defines the data exchanged between:
- the surface classifier (capability lookups, rejected-surface memory)
- the wall scanner (probe results)
- the orientation solver and corner handler
- the wall-run state machine and its owner (events, exit reasons)

Conventions
- Units are meters and seconds.
- Right-handed, +Y up. A character with identity rotation faces -Z with +X to its right.
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// Capsule dimensions of the wall-running character.
///
/// half_height is the half-length of the cylinder section (aligned with +Y),
/// so the total capsule height is 2*half_height + 2*radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapsuleSpec {
    pub radius: f32,
    pub half_height: f32,
}

/// Identifies a piece of level geometry.
///
/// `owner` is the level object the capability is declared on; `part` distinguishes the individual
/// colliders of that object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId {
    pub owner: u32,
    pub part: u32,
}

impl SurfaceId {
    #[inline]
    pub const fn new(owner: u32, part: u32) -> Self {
        Self { owner, part }
    }
}

/// A single directional probe (or collision) hit against level geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// The geometry that was hit.
    pub surface: SurfaceId,
    /// World-space impact point.
    pub point: Vec3,
    /// World-space surface normal at the impact point, pointing out of the surface.
    pub normal: Vec3,
}

/// Which side of the character the wall is on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WallRunSide {
    #[default]
    None,
    Left,
    Right,
}

impl WallRunSide {
    /// Derive the side from the character's right axis and the wall normal.
    ///
    /// A wall normal pointing toward the character's right means the wall is on its left.
    #[inline]
    pub fn from_contact(character_right: Vec3, wall_normal: Vec3) -> Self {
        if character_right.dot(&wall_normal) > 0.0 {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// World direction from the character toward the wall.
    ///
    /// Returns `None` for [`WallRunSide::None`].
    #[inline]
    pub fn toward_wall(self, character_right: Vec3) -> Option<Vec3> {
        match self {
            Self::None => None,
            Self::Left => Some(-character_right),
            Self::Right => Some(character_right),
        }
    }
}

/// Kind of corner the scanner found ahead of the character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CornerType {
    /// The wall continues into the character's forward path.
    Inner,
    /// The wall ends; it continues only by turning around its edge.
    Outer,
}

/// Locomotion mode of the owning character.
///
/// `Walking` and `Falling` belong to the stock controller; `WallRunning` is the custom mode
/// driven by [`crate::WallRunner`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MovementMode {
    Walking,
    #[default]
    Falling,
    WallRunning,
}

/// Why a wall run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallRunExit {
    /// The owner asked to stop.
    Stopped,
    /// No wall and no corner within reach.
    WallLost,
    /// A corner was found but the player was not steering around it.
    DeclinedCorner,
    /// The contact normal gave no usable frame (floor/ceiling-like or zero).
    DegenerateContact,
    /// The owner switched the movement mode (landing, jumping off, ...).
    ModeChanged,
}

/// Notifications produced by the state machine for animation/camera consumers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WallRunEvent {
    /// A run was accepted; the initiation motion is starting.
    Started { side: WallRunSide },
    /// The initiation motion completed; wall-following is active.
    Initiated,
    /// The character is starting to turn around a corner.
    CornerTurnBegin { direction: Vec3, corner: CornerType },
    /// The corner turn finished (or was abandoned by an exit).
    CornerTurnEnd,
    /// The run is over and the character is back under the stock controller.
    Ended { reason: WallRunExit },
}
