//! The local player: stock walking/falling/jumping locomotion with the wall runner attached.
//!
//! Simulation runs in `FixedUpdate` on [`Body`]; the rendered `Transform` is smoothed toward it in
//! `Update`. Wall-run notifications are re-published as [`WallRunMessage`]s for the camera and HUD.

use std::time::Duration;

use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;
use nalgebra as na;
use wallrun::{
    CapsuleSpec, CharacterState, MovementMode, WallRunEvent, WallRunSettings, WallRunner,
    interp_rotation_to,
};

use crate::{
    camera::CameraRig,
    convert::{to_bevy_quat, to_bevy_vec, to_na_quat, to_na_vec},
    input::PlayerAction,
    level::LevelWorld,
};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<WallRunMessage>();

    app.add_systems(Startup, spawn_player);
    app.add_systems(Update, (gather_input, sync_transform));
    app.add_systems(
        FixedUpdate,
        (
            locomotion,
            tick_wall_run,
            publish_wall_run_messages,
            respawn_fallen,
        )
            .chain(),
    );
}

pub const PLAYER_CAPSULE: CapsuleSpec = CapsuleSpec {
    radius: 0.35,
    half_height: 0.55,
};
const SPAWN_POINT: Vec3 = Vec3::new(0.0, 2.0, 6.0);
const KILL_Y: f32 = -20.0;

const WALK_SPEED_MPS: f32 = 6.0;
const AIR_CONTROL: f32 = 2.0;
const JUMP_SPEED_MPS: f32 = 6.5;
const WALL_JUMP_PUSH_MPS: f32 = 5.0;
const GRAVITY_MPS2: f32 = -20.0;
const TERMINAL_FALL_SPEED_MPS: f32 = -40.0;
/// Very slight downward bias while walking to keep contact on slopes.
const GROUND_BIAS_VELOCITY: f32 = -0.125;
/// Interp-to rate at which the character turns to face its movement.
const FACING_INTERP_SPEED: f32 = 10.0;
const RENDER_DECAY_RATE: f32 = 24.0;

/// Latch onto walls on contact; with `false` the player holds the wall-run key.
const AUTO_WALL_RUN_PLAYER: bool = true;

#[derive(Component)]
pub struct Player;

/// Simulated character state, owned by the stock locomotion.
#[derive(Component, Debug)]
pub struct Body(pub CharacterState);

#[derive(Component, Debug)]
pub struct WallRun(pub WallRunner);

/// Input gathered every frame for the fixed ticks that follow.
///
/// Held axes are refreshed each frame and read by every fixed tick; presses accumulate until the
/// next fixed tick consumes them.
#[derive(Component, Debug, Default)]
pub struct PendingInput {
    movement: Vec2,
    view_yaw: f32,
    jump: bool,
    wall_run_pressed: bool,
    wall_run_released: bool,
}

/// What one fixed tick sees of [`PendingInput`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct TickInput {
    movement: Vec2,
    view_yaw: f32,
    jump: bool,
    wall_run_pressed: bool,
    wall_run_released: bool,
}

impl PendingInput {
    fn take_tick(&mut self) -> TickInput {
        TickInput {
            movement: self.movement,
            view_yaw: self.view_yaw,
            jump: std::mem::take(&mut self.jump),
            wall_run_pressed: std::mem::take(&mut self.wall_run_pressed),
            wall_run_released: std::mem::take(&mut self.wall_run_released),
        }
    }
}

/// A wall-run notification from one character.
#[derive(Message, Debug, Clone, Copy)]
pub struct WallRunMessage {
    pub entity: Entity,
    pub event: WallRunEvent,
}

fn player_wall_run_settings() -> WallRunSettings {
    let settings = WallRunSettings {
        auto_wall_run: AUTO_WALL_RUN_PLAYER,
        ..default()
    };

    match settings.validate() {
        Ok(()) => settings,
        Err(reason) => {
            error!("Invalid wall-run settings ({reason}); using defaults");
            WallRunSettings::default()
        }
    }
}

fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let body = CharacterState::new(
        to_na_vec(SPAWN_POINT),
        wallrun::Quat::identity(),
        PLAYER_CAPSULE,
    );

    commands.spawn((
        Name::new("Player"),
        Player,
        Body(body),
        WallRun(WallRunner::new(player_wall_run_settings())),
        PendingInput::default(),
        Mesh3d(meshes.add(Capsule3d::new(
            PLAYER_CAPSULE.radius,
            PLAYER_CAPSULE.half_height * 2.0,
        ))),
        MeshMaterial3d(materials.add(Color::srgb_u8(255, 144, 124))),
        Transform::from_translation(SPAWN_POINT),
    ));
}

fn gather_input(
    actions: Res<ActionState<PlayerAction>>,
    rig: Res<CameraRig>,
    mut pending: Single<&mut PendingInput, With<Player>>,
) {
    pending.movement = actions.axis_pair(&PlayerAction::Move).clamp_length_max(1.0);
    pending.view_yaw = rig.yaw();
    pending.jump |= actions.just_pressed(&PlayerAction::Jump);
    pending.wall_run_pressed |= actions.just_pressed(&PlayerAction::WallRun);
    pending.wall_run_released |= actions.just_released(&PlayerAction::WallRun);
}

/// Planar wish direction from view-relative input (x = right, y = forward).
fn planar_wish(view_yaw: f32, movement: Vec2) -> wallrun::Vec3 {
    let view = to_na_quat(Quat::from_rotation_y(view_yaw));
    let wish = view * wallrun::Vec3::new(movement.x, 0.0, -movement.y);
    if wish.norm_squared() > 1.0 {
        wish.normalize()
    } else {
        wish
    }
}

/// Upright rotation facing `direction`; `None` when it has no planar part.
fn facing(direction: wallrun::Vec3) -> Option<wallrun::Quat> {
    if direction.x * direction.x + direction.z * direction.z <= 1.0e-8 {
        return None;
    }
    let yaw = (-direction.x).atan2(-direction.z);
    Some(wallrun::Quat::from_axis_angle(&na::Vector3::y_axis(), yaw))
}

/// The stock controller. Hands the character to the wall runner on an accepted contact.
fn locomotion(
    time: Res<Time>,
    level: Option<Res<LevelWorld>>,
    player: Single<(&mut Body, &mut WallRun, &mut PendingInput), With<Player>>,
) {
    let Some(level) = level else {
        return;
    };
    let (mut body, mut wall_run, mut pending) = player.into_inner();
    let input = pending.take_tick();
    let now = time.elapsed();
    let dt = time.delta_secs();
    let body = &mut body.0;
    let runner = &mut wall_run.0;

    if input.wall_run_pressed {
        runner.wall_run_start();
    }
    if input.wall_run_released {
        runner.wall_run_stop(body, now);
    }

    let routed = runner.add_input_vector(body, planar_wish(input.view_yaw, input.movement));

    if body.is_wall_running() {
        if input.jump && runner.can_attempt_jump(body, false) {
            jump_off_wall(body, runner, now);
        }
        return;
    }
    let wish = routed.unwrap_or_else(wallrun::Vec3::zeros);
    if let Some(target) = facing(wish) {
        body.rotation = interp_rotation_to(body.rotation, target, dt, FACING_INTERP_SPEED);
    }

    let walking = body.mode == MovementMode::Walking;
    let target = wish * WALK_SPEED_MPS;
    let mut velocity = body.velocity;
    if walking {
        velocity.x = target.x;
        velocity.z = target.z;
    } else if wish.norm_squared() > 0.0 {
        let blend = (AIR_CONTROL * dt).clamp(0.0, 1.0);
        velocity.x += (target.x - velocity.x) * blend;
        velocity.z += (target.z - velocity.z) * blend;
    }

    if input.jump && runner.can_attempt_jump(body, walking) {
        velocity.y = JUMP_SPEED_MPS;
        runner.set_movement_mode(body, MovementMode::Falling, now);
    }

    if body.is_falling() {
        velocity.y = (velocity.y + GRAVITY_MPS2 * dt).max(TERMINAL_FALL_SPEED_MPS);
    }

    let mut desired = velocity * dt;
    if body.mode == MovementMode::Walking {
        velocity.y = 0.0;
        desired.y = GROUND_BIAS_VELOCITY * dt;
    }

    let moved = level
        .0
        .move_character(body.capsule, body.translation, body.rotation, desired, dt);
    body.translation = moved.translation;
    body.velocity = velocity;

    if moved.grounded {
        if body.is_falling() && body.velocity.y <= 0.0 {
            body.velocity.y = 0.0;
            runner.set_movement_mode(body, MovementMode::Walking, now);
        }
    } else if body.mode == MovementMode::Walking {
        runner.set_movement_mode(body, MovementMode::Falling, now);
    }

    if body.is_falling() {
        for hit in &moved.hits {
            if runner.on_capsule_hit(body, &level.0, hit, now) {
                break;
            }
        }
    }
}

/// Leave the wall with a push away from it and an upward kick.
fn jump_off_wall(body: &mut CharacterState, runner: &mut WallRunner, now: Duration) {
    let away = runner
        .contact()
        .and_then(|contact| contact.normal.try_normalize(1.0e-6))
        .unwrap_or_else(wallrun::Vec3::zeros);
    let along = body.velocity;

    runner.set_movement_mode(body, MovementMode::Falling, now);
    body.velocity = along + away * WALL_JUMP_PUSH_MPS + wallrun::Vec3::y() * JUMP_SPEED_MPS;
    debug!("jumped off wall with velocity {:?}", body.velocity);
}

fn tick_wall_run(
    time: Res<Time>,
    level: Option<Res<LevelWorld>>,
    mut query: Query<(&mut Body, &mut WallRun)>,
) {
    let Some(level) = level else {
        return;
    };
    let _span = tracing::debug_span!("wall_run_tick").entered();

    for (mut body, mut wall_run) in &mut query {
        wall_run
            .0
            .tick(&mut body.0, &level.0, time.elapsed(), time.delta_secs());
    }
}

fn publish_wall_run_messages(
    mut query: Query<(Entity, &mut WallRun)>,
    mut writer: MessageWriter<WallRunMessage>,
) {
    for (entity, mut wall_run) in &mut query {
        for event in wall_run.0.drain_events() {
            writer.write(WallRunMessage { entity, event });
        }
    }
}

fn respawn_fallen(time: Res<Time>, mut query: Query<(&mut Body, &mut WallRun), With<Player>>) {
    for (mut body, mut wall_run) in &mut query {
        if body.0.translation.y >= KILL_Y {
            continue;
        }

        warn!("Player fell out of the level; respawning");
        wall_run
            .0
            .set_movement_mode(&mut body.0, MovementMode::Falling, time.elapsed());
        body.0 = CharacterState::new(
            to_na_vec(SPAWN_POINT),
            wallrun::Quat::identity(),
            PLAYER_CAPSULE,
        );
    }
}

fn sync_transform(time: Res<Time>, mut query: Query<(&mut Transform, &Body), With<Player>>) {
    let dt = time.delta_secs();

    for (mut transform, body) in &mut query {
        transform
            .translation
            .smooth_nudge(&to_bevy_vec(body.0.translation), RENDER_DECAY_RATE, dt);
        transform.rotation = transform
            .rotation
            .slerp(to_bevy_quat(body.0.rotation), 1.0 - (-RENDER_DECAY_RATE * dt).exp());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wish_direction_follows_view_yaw() {
        let forward = planar_wish(0.0, Vec2::new(0.0, 1.0));
        assert!((forward - wallrun::Vec3::new(0.0, 0.0, -1.0)).norm() < 1.0e-6);

        let turned = planar_wish(std::f32::consts::FRAC_PI_2, Vec2::new(0.0, 1.0));
        assert!((turned - wallrun::Vec3::new(-1.0, 0.0, 0.0)).norm() < 1.0e-5);

        let strafe = planar_wish(std::f32::consts::FRAC_PI_2, Vec2::new(1.0, 0.0));
        assert!((strafe - wallrun::Vec3::new(0.0, 0.0, -1.0)).norm() < 1.0e-5);

        let diagonal = planar_wish(0.3, Vec2::new(1.0, 1.0));
        assert!((diagonal.norm() - 1.0).abs() < 1.0e-5);
    }

    #[test]
    fn facing_points_forward_along_the_wish() {
        for wish in [
            wallrun::Vec3::new(-1.0, 0.0, 0.0),
            wallrun::Vec3::new(0.6, 0.0, 0.8),
            wallrun::Vec3::new(0.0, 0.5, -2.0),
        ] {
            let rotation = facing(wish).unwrap();
            let forward = rotation * wallrun::Vec3::new(0.0, 0.0, -1.0);
            let planar = wallrun::Vec3::new(wish.x, 0.0, wish.z).normalize();
            assert!((forward - planar).norm() < 1.0e-5, "{wish:?}");
        }
        assert!(facing(wallrun::Vec3::y()).is_none());
    }

    #[test]
    fn held_input_reaches_every_tick_of_a_frame() {
        let mut pending = PendingInput {
            movement: Vec2::new(1.0, 0.0),
            view_yaw: 0.4,
            jump: true,
            wall_run_pressed: true,
            wall_run_released: false,
        };

        let first = pending.take_tick();
        let second = pending.take_tick();
        assert_eq!(first.movement, Vec2::new(1.0, 0.0));
        assert_eq!(second.movement, first.movement);
        assert_eq!(second.view_yaw, 0.4);
        assert!(first.jump && first.wall_run_pressed);
        assert!(!second.jump && !second.wall_run_pressed);
    }

    #[test]
    fn steering_is_routed_on_every_tick_of_a_frame() {
        let mut runner = WallRunner::new(player_wall_run_settings());
        let mut body = CharacterState::new(
            wallrun::Vec3::zeros(),
            wallrun::Quat::identity(),
            PLAYER_CAPSULE,
        );
        let contact = wallrun::Contact {
            surface: wallrun::SurfaceId::new(1, 0),
            point: wallrun::Vec3::new(-0.5, 0.0, 0.0),
            normal: wallrun::Vec3::x(),
        };
        let runnable = |_: wallrun::SurfaceId| true;
        assert!(runner.on_capsule_hit(&mut body, &runnable, &contact, Duration::ZERO));

        let mut pending = PendingInput {
            movement: Vec2::new(1.0, 0.0),
            ..default()
        };
        for _ in 0..3 {
            let input = pending.take_tick();
            let wish = planar_wish(input.view_yaw, input.movement);
            assert!(wish.norm() > 0.9);
            assert_eq!(runner.add_input_vector(&body, wish), None);
        }
    }

    #[test]
    fn default_player_settings_are_valid() {
        assert!(player_wall_run_settings().validate().is_ok());
    }

    #[test]
    fn wall_jump_leaves_wall_running_with_a_push() {
        let mut runner = WallRunner::new(player_wall_run_settings());
        let mut body = CharacterState::new(
            wallrun::Vec3::zeros(),
            wallrun::Quat::identity(),
            PLAYER_CAPSULE,
        );
        let contact = wallrun::Contact {
            surface: wallrun::SurfaceId::new(1, 0),
            point: wallrun::Vec3::new(-0.5, 0.0, 0.0),
            normal: wallrun::Vec3::x(),
        };
        let now = Duration::from_secs(1);
        assert!(runner.on_capsule_hit(&mut body, &|_: wallrun::SurfaceId| true, &contact, now));

        jump_off_wall(&mut body, &mut runner, now);
        assert_eq!(body.mode, MovementMode::Falling);
        assert!(body.velocity.x > 0.0);
        assert!(body.velocity.y > 0.0);
        assert!(runner.is_cooldown_active(now));
    }
}
