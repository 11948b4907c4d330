use bevy::prelude::*;

use time_runner::config::tuning::Tuning;
use time_runner::plugins::{game_plugin::GamePlugin, menu_plugin::MenuPlugin, storage_plugin::StoragePlugin, ui_plugin::UiPlugin};

fn main() {
    let tuning = Tuning::load_or_default();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Time Runner".into(),
                resolution: (tuning.window_width as u32, tuning.window_height as u32).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(tuning)
        .add_plugins(GamePlugin)
        .add_plugins(MenuPlugin)
        .add_plugins(UiPlugin)
        .add_plugins(StoragePlugin)
        .run();
}
