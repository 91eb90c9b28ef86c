use crate::types::{CapsuleSpec, MovementMode, Quat, Vec3};

/// Kinematic state of the character that owns a [`crate::WallRunner`].
///
/// The stock controller owns this value and integrates it while walking/falling; the wall runner
/// writes to it only while the mode is [`MovementMode::WallRunning`]. Mode changes should go
/// through [`crate::WallRunner::set_movement_mode`] so leaving a run starts the cooldown.
#[derive(Clone, Copy, Debug)]
pub struct CharacterState {
    /// Capsule center (world space).
    pub translation: Vec3,
    pub rotation: Quat,
    /// Current velocity (meters per second).
    pub velocity: Vec3,
    pub capsule: CapsuleSpec,
    pub mode: MovementMode,
}

impl CharacterState {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat, capsule: CapsuleSpec) -> Self {
        Self {
            translation,
            rotation,
            velocity: Vec3::zeros(),
            capsule,
            mode: MovementMode::Falling,
        }
    }

    /// Facing direction (local -Z).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::new(0.0, 0.0, -1.0)
    }

    /// Local +X.
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::x()
    }

    /// Local +Y.
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::y()
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.mode == MovementMode::Falling
    }

    #[inline]
    pub fn is_wall_running(&self) -> bool {
        self.mode == MovementMode::WallRunning
    }
}
