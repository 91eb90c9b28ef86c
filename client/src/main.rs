// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]
// Disable console on Windows for non-dev builds.
#![cfg_attr(not(feature = "dev"), windows_subsystem = "windows")]

#[cfg(feature = "dev_native")]
mod debug_tools;

mod camera;
mod convert;
mod input;
mod level;
mod player;

#[cfg(target_os = "macos")]
use bevy::window::CompositeAlphaMode;

use bevy::{log::LogPlugin, prelude::*};

fn main() -> AppExit {
    App::new().add_plugins(AppPlugin).run()
}

/// Simulation rate of the character controllers.
pub const FIXED_HZ: f64 = 64.0;

pub struct AppPlugin;
impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Window {
                        title: "Wall Run".to_string(),
                        fit_canvas_to_parent: true,
                        #[cfg(target_os = "macos")]
                        composite_alpha_mode: CompositeAlphaMode::PostMultiplied,
                        ..default()
                    }
                    .into(),
                    ..default()
                })
                .set(LogPlugin {
                    filter: "wgpu=error,naga=warn,wallrun=debug,wallrun_client=debug".to_string(),
                    ..default()
                }),
        );
        app.insert_resource(Time::<Fixed>::from_hz(FIXED_HZ));

        app.add_plugins((
            level::plugin,
            input::plugin,
            player::plugin,
            camera::plugin,
        ));

        #[cfg(feature = "dev_native")]
        app.add_plugins(debug_tools::plugin);
    }
}
