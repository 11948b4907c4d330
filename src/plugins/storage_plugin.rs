use bevy::prelude::*;

use crate::config::tuning::Tuning;
use crate::storage::history::{CsvHistoryLog, HistorySink};

pub struct StoragePlugin;

impl Plugin for StoragePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_storage);
    }
}

/// Install the CSV history log next to the tuning file.
fn init_storage(mut commands: Commands, tuning: Res<Tuning>) {
    let path = tuning.history_path();
    info!("Recording match history at {:?}", path);
    commands.insert_resource(HistorySink(Box::new(CsvHistoryLog::new(path))));
}
