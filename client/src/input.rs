use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    /// Planar movement relative to the camera (x = right, y = forward).
    #[actionlike(DualAxis)]
    Move,
    /// Keyboard camera yaw; positive turns right.
    #[actionlike(Axis)]
    Turn,
    /// Mouse camera yaw in pixels of horizontal motion.
    #[actionlike(Axis)]
    Look,
    Jump,
    /// Hold to wall-run when auto wall-running is disabled.
    WallRun,
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<PlayerAction>::default());

    app.register_type::<PlayerAction>();

    let mut input_map = InputMap::<PlayerAction>::default();
    input_map.insert_dual_axis(PlayerAction::Move, VirtualDPad::wasd());
    input_map.insert_axis(PlayerAction::Turn, VirtualAxis::horizontal_arrow_keys());
    input_map.insert_axis(PlayerAction::Look, MouseMoveAxis::X);
    input_map.insert(PlayerAction::Jump, KeyCode::Space);
    input_map.insert(PlayerAction::WallRun, KeyCode::ShiftLeft);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<PlayerAction>::default());
}
