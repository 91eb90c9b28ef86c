//! Debug/performance tooling for native dev builds.
//!
//! Compiled only with `dev_native` (`#[cfg(feature = "dev_native")] mod debug_tools;` in
//! `main.rs`). Adds the frame diagnostics, an FPS overlay, and a wall-run status line.

use bevy::dev_tools::fps_overlay::FpsOverlayPlugin;
use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;

use crate::player::{Body, Player, WallRun};

#[derive(Component)]
struct WallRunStatusText;

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
    ));
    app.add_plugins(FpsOverlayPlugin::default());

    app.add_systems(Startup, spawn_status_text);
    app.add_systems(Update, update_status_text);
}

fn spawn_status_text(mut commands: Commands) {
    commands.spawn((
        WallRunStatusText,
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        },
    ));
}

fn update_status_text(
    time: Res<Time<Fixed>>,
    player: Single<(&Body, &WallRun), With<Player>>,
    mut text: Single<&mut Text, With<WallRunStatusText>>,
) {
    let (body, wall_run) = player.into_inner();
    let runner = &wall_run.0;

    text.0 = format!(
        "mode: {:?}  phase: {:?}  side: {:?}  cooldown: {:.2}s",
        body.0.mode,
        runner.state(),
        runner.side(),
        runner.cooldown_remaining(time.elapsed()).as_secs_f32(),
    );
}
