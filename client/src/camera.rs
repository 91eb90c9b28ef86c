use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;
use wallrun::WallRunEvent;

use crate::{
    convert::to_bevy_vec,
    input::PlayerAction,
    player::{Player, WallRunMessage},
};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<CameraRig>();
    app.add_systems(Startup, add_camera);
    app.add_systems(PostUpdate, (track_corner_turns, steer_view, follow_player).chain());
}

/// Offset from the player in the camera's yaw frame: above and behind.
const CAMERA_OFFSET_LOCAL: Vec3 = Vec3::new(0.0, 2.5, 6.0);
const CAMERA_LOOK_HEIGHT: f32 = 1.0;
const CAMERA_DECAY_RATE: f32 = 12.0;
const TURN_SPEED_RAD_S: f32 = 2.5;
const LOOK_SENSITIVITY_RAD_PER_PX: f32 = 0.003;
/// Yaw interp speed while locked onto a corner turn.
const CORNER_LOCK_INTERP_SPEED: f32 = 7.0;

/// View yaw shared by the camera and the player's movement input.
///
/// Free look while running or walking; while a corner turn is in flight the yaw locks onto the
/// turn direction and look input is ignored.
#[derive(Resource, Debug, Default)]
pub struct CameraRig {
    yaw: f32,
    corner_lock: Option<Vec3>,
}

impl CameraRig {
    /// Yaw about +Y; zero looks down -Z.
    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    fn steer(&mut self, look_rad: f32, dt: f32) {
        let locked_yaw = self.corner_lock.and_then(yaw_from_xz);
        match locked_yaw {
            Some(target) => self.yaw = interp_yaw(self.yaw, target, dt, CORNER_LOCK_INTERP_SPEED),
            None => self.yaw -= look_rad,
        }
    }
}

fn add_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(CAMERA_OFFSET_LOCAL).looking_at(Vec3::ZERO, Vec3::Y),
        DistanceFog {
            color: Color::srgba(0.35, 0.48, 0.66, 1.0),
            directional_light_color: Color::srgba(1.0, 0.95, 0.85, 0.5),
            directional_light_exponent: 30.0,
            falloff: FogFalloff::from_visibility_colors(
                200.0,
                Color::srgb(0.35, 0.5, 0.66),
                Color::srgb(0.8, 0.8, 0.7),
            ),
        },
    ));
}

/// Yaw that faces `direction` with -Z forward.
fn yaw_from_xz(direction: Vec3) -> Option<f32> {
    const YAW_EPS: f32 = 1.0e-6;
    if direction.xz().length_squared() > YAW_EPS {
        return Some((-direction.x).atan2(-direction.z));
    }

    None
}

/// Move `current` toward `target` by `clamp(dt * speed, 0, 1)` of the shortest angular distance.
fn interp_yaw(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    let delta = (target - current + std::f32::consts::PI).rem_euclid(std::f32::consts::TAU)
        - std::f32::consts::PI;
    current + delta * (dt * speed).clamp(0.0, 1.0)
}

fn track_corner_turns(
    mut rig: ResMut<CameraRig>,
    mut messages: MessageReader<WallRunMessage>,
    player: Query<(), With<Player>>,
) {
    for msg in messages.read() {
        if player.get(msg.entity).is_err() {
            continue;
        }

        match msg.event {
            WallRunEvent::CornerTurnBegin { direction, .. } => {
                rig.corner_lock = Some(to_bevy_vec(direction));
            }
            WallRunEvent::CornerTurnEnd | WallRunEvent::Ended { .. } => {
                rig.corner_lock = None;
            }
            _ => {}
        }
    }
}

fn steer_view(
    mut rig: ResMut<CameraRig>,
    actions: Res<ActionState<PlayerAction>>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();
    let look = actions.value(&PlayerAction::Look) * LOOK_SENSITIVITY_RAD_PER_PX
        + actions.value(&PlayerAction::Turn) * TURN_SPEED_RAD_S * dt;
    rig.steer(look, dt);
}

fn follow_player(
    rig: Res<CameraRig>,
    mut camera: Single<&mut Transform, (With<Camera3d>, Without<Player>)>,
    player_tf: Single<&Transform, With<Player>>,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    let target = player_tf.translation + Quat::from_rotation_y(rig.yaw) * CAMERA_OFFSET_LOCAL;
    camera
        .translation
        .smooth_nudge(&target, CAMERA_DECAY_RATE, dt);

    let look_at = player_tf.translation + Vec3::Y * CAMERA_LOOK_HEIGHT;
    camera.look_at(look_at, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaw_faces_negative_z_at_zero() {
        assert_eq!(yaw_from_xz(Vec3::NEG_Z), Some(0.0));
        assert!(yaw_from_xz(Vec3::Y).is_none());

        let yaw = yaw_from_xz(Vec3::NEG_X).unwrap();
        let forward = Quat::from_rotation_y(yaw) * Vec3::NEG_Z;
        assert!(forward.distance(Vec3::NEG_X) < 1.0e-5);
    }

    #[test]
    fn look_turns_freely_until_a_corner_locks_the_view() {
        let mut rig = CameraRig::default();
        rig.steer(0.5, 0.016);
        assert!((rig.yaw() + 0.5).abs() < 1.0e-6);

        rig.corner_lock = Some(Vec3::NEG_X);
        let target = yaw_from_xz(Vec3::NEG_X).unwrap();
        for _ in 0..60 {
            rig.steer(10.0, 0.05);
        }
        let delta = (rig.yaw() - target).rem_euclid(std::f32::consts::TAU);
        assert!(delta < 1.0e-3 || std::f32::consts::TAU - delta < 1.0e-3);

        rig.corner_lock = None;
        let before = rig.yaw();
        rig.steer(-0.25, 0.016);
        assert!((rig.yaw() - before - 0.25).abs() < 1.0e-6);
    }

    #[test]
    fn yaw_interp_takes_the_short_way_round() {
        let current = 3.0;
        let target = -3.0;
        let next = interp_yaw(current, target, 0.1, 5.0);
        // Shortest path crosses +PI rather than sweeping back through zero.
        assert!(next > current);
        let reached = interp_yaw(current, target, 1.0, 5.0);
        assert!((reached - (target + std::f32::consts::TAU)).abs() < 1.0e-5);
    }
}
