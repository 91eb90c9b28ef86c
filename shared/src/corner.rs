use crate::{
    motion::Pose,
    orientation::WallRunFrame,
    types::{CapsuleSpec, Contact, CornerType, Vec3},
};

/// Outcome of reaching a corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CornerDecision {
    /// Carry the character around the corner.
    Turn(CornerTurn),
    /// The player isn't steering around it; fall off.
    Decline,
}

/// A corner turn the state machine should play.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CornerTurn {
    pub corner: CornerType,
    /// Travel direction after the turn.
    pub direction: Vec3,
    /// Where the character is re-seated: one capsule radius off the new wall.
    pub target: Pose,
}

/// Decide whether to turn around a corner.
///
/// The player wants to turn when the captured steering input points along the post-corner
/// travel direction (`frame.forward`). A zero steering vector never turns.
pub fn decide_corner_turn(
    corner: CornerType,
    contact: &Contact,
    frame: &WallRunFrame,
    steering: Vec3,
    capsule: CapsuleSpec,
) -> CornerDecision {
    if frame.forward.dot(&steering) <= 0.0 {
        return CornerDecision::Decline;
    }

    let normal = contact.normal.try_normalize(0.0).unwrap_or(frame.lateral);
    CornerDecision::Turn(CornerTurn {
        corner,
        direction: frame.forward,
        target: Pose {
            translation: contact.point + normal * capsule.radius,
            rotation: frame.rotation,
        },
    })
}
