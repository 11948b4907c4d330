pub mod aim;
pub mod boss;
pub mod camera;
pub mod clock;
pub mod collision;
pub mod components;
pub mod enemy;
pub mod events;
pub mod intent;
pub mod map;
pub mod match_state;
pub mod player;
pub mod projectile;
pub mod types;

use bevy::prelude::*;

use crate::config::tuning::Tuning;
use crate::storage::history::HistorySink;
use camera::{CameraOffset, Viewport};
use clock::FrameClock;
use collision::ObstacleSet;
use events::{GameEvent, MatchCommand, MatchEnded};
use intent::Intent;
use match_state::{HudSnapshot, MatchSession, match_running};

// ── SystemSets (strict Update ordering) ─────────────────────────────

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Start / restart / quit. Runs in every status.
    CommandSet,
    ClockSet,
    FireSet,
    CollisionDetectSet,
    MoveSet,
    EventApplySet,
    CleanupSet,
    ResolveSet,
    /// Camera, HUD and history. Runs in every status.
    ReportSet,
}

/// Headless simulation core: resources, messages and the per-frame chain.
///
/// Reads `FrameClock::delta` and `Intent`; whoever drives the app (the
/// windowed game or a test) is responsible for writing them.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<GameEvent>();
        app.add_message::<MatchCommand>();
        app.add_message::<MatchEnded>();

        app.init_resource::<Tuning>();
        app.init_resource::<FrameClock>();
        app.init_resource::<Intent>();
        app.init_resource::<Viewport>();
        app.init_resource::<CameraOffset>();
        app.init_resource::<ObstacleSet>();
        app.init_resource::<MatchSession>();
        app.init_resource::<HudSnapshot>();

        // Everything between the command and report sets is frozen outside Running.
        app.configure_sets(
            Update,
            (
                SimSet::CommandSet,
                SimSet::ClockSet.run_if(match_running),
                SimSet::FireSet.run_if(match_running),
                SimSet::CollisionDetectSet.run_if(match_running),
                SimSet::MoveSet.run_if(match_running),
                SimSet::EventApplySet.run_if(match_running),
                SimSet::CleanupSet.run_if(match_running),
                SimSet::ResolveSet.run_if(match_running),
                SimSet::ReportSet,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            match_state::apply_match_commands.in_set(SimSet::CommandSet),
        );

        app.add_systems(
            Update,
            (clock::advance_match_clock, player::rearm_fire_control)
                .chain()
                .in_set(SimSet::ClockSet),
        );

        app.add_systems(
            Update,
            projectile::fire_projectile.in_set(SimSet::FireSet),
        );

        app.add_systems(
            Update,
            (collision::projectile_enemy_hits, collision::player_contact)
                .chain()
                .in_set(SimSet::CollisionDetectSet),
        );

        // MoveSet: chained, every step writes Body
        app.add_systems(
            Update,
            (
                player::update_player,
                aim::update_aim,
                projectile::advance_projectiles,
                enemy::seek_player,
            )
                .chain()
                .in_set(SimSet::MoveSet),
        );

        app.add_systems(
            Update,
            boss::apply_damage_events.in_set(SimSet::EventApplySet),
        );

        app.add_systems(
            Update,
            projectile::handle_despawn_events.in_set(SimSet::CleanupSet),
        );

        app.add_systems(
            Update,
            match_state::evaluate_match.in_set(SimSet::ResolveSet),
        );

        app.add_systems(
            Update,
            (
                match_state::record_match_history.run_if(resource_exists::<HistorySink>),
                camera::update_camera_offset,
                match_state::update_hud,
            )
                .chain()
                .in_set(SimSet::ReportSet),
        );
    }
}
