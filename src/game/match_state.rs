use bevy::prelude::*;

use super::aim::reticle_bundle;
use super::boss::{Boss, boss_bundle};
use super::clock::FrameClock;
use super::collision::ObstacleSet;
use super::components::*;
use super::enemy::enemy_bundle;
use super::events::{MatchCommand, MatchEnded};
use super::map::{LoadedMap, MapSource, MapSpec};
use super::player::{Ammo, Stamina, player_bundle};
use super::types::MatchResult;
use crate::config::tuning::Tuning;
use crate::storage::history::{HistorySink, MatchRecord};

// ── Session state ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchStatus {
    /// No match has been started yet.
    #[default]
    Idle,
    Running,
    PlayerDead,
    BossDefeated,
}

impl MatchStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::PlayerDead | Self::BossDefeated)
    }
}

/// The match currently being played.
///
/// `player_hit` and `boss_down` are raised during the frame by collision and
/// damage systems; `evaluate_match` turns them into a status transition.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct MatchSession {
    pub nickname: String,
    pub status: MatchStatus,
    pub boss: Option<Entity>,
    pub player_hit: bool,
    pub boss_down: bool,
}

impl MatchSession {
    fn begin(nickname: String, boss: Option<Entity>) -> Self {
        Self {
            nickname,
            status: MatchStatus::Running,
            boss,
            player_hit: false,
            boss_down: false,
        }
    }
}

/// Run condition: the per-frame simulation only runs in `Running`.
pub fn match_running(session: Res<MatchSession>) -> bool {
    session.status == MatchStatus::Running
}

// ── Commands ────────────────────────────────────────────────────────

/// Spawn every entity of a match from its map. Returns the boss, if any.
pub fn spawn_match(commands: &mut Commands, spec: &MapSpec, tuning: &Tuning) -> Option<Entity> {
    let tile = spec.tile_size;
    for (layer, tiles) in spec.layers.iter().enumerate() {
        for (x, y, image) in &tiles.tiles {
            let top_left = Vec2::new(*x as f32, *y as f32) * tile;
            commands.spawn((
                Tile {
                    image: image.clone(),
                    layer,
                },
                InMatch,
                Body::new(top_left + Vec2::splat(tile * 0.5), Vec2::splat(tile)),
            ));
        }
    }

    if let Some(center) = spec.player_spawn() {
        commands.spawn(player_bundle(center, tuning));
        commands.spawn(reticle_bundle(center, tuning));
    }
    for center in spec.enemy_spawns() {
        commands.spawn(enemy_bundle(center, tuning));
    }
    spec.boss_spawn()
        .map(|center| commands.spawn(boss_bundle(center, tuning)).id())
}

/// Commands: start, restart and quit.
///
/// Restart is only honoured once the match has ended. At most one start or
/// restart takes effect per frame (the last one read): it tears down the
/// previous match and respawns it from the map, re-read from disk when the
/// map has a source file.
pub fn apply_match_commands(
    mut commands: Commands,
    mut requests: MessageReader<MatchCommand>,
    mut session: ResMut<MatchSession>,
    mut clock: ResMut<FrameClock>,
    mut obstacles: ResMut<ObstacleSet>,
    mut exit: MessageWriter<AppExit>,
    tuning: Res<Tuning>,
    map: Option<ResMut<LoadedMap>>,
    source: Option<Res<MapSource>>,
    existing: Query<Entity, With<InMatch>>,
) {
    let mut pending: Option<String> = None;
    for request in requests.read() {
        match request {
            MatchCommand::Start { nickname } => pending = Some(nickname.clone()),
            MatchCommand::Restart if pending.is_none() && session.status.is_terminal() => {
                pending = Some(session.nickname.clone());
            }
            MatchCommand::Restart => {
                debug!("Ignoring restart, match status is {:?}", session.status);
            }
            MatchCommand::Quit => {
                info!("Quit requested");
                exit.write(AppExit::Success);
            }
        }
    }
    let Some(nickname) = pending else {
        return;
    };

    let Some(mut map) = map else {
        error!("Cannot start a match: no map loaded");
        return;
    };
    if let Some(source) = source.as_deref() {
        match MapSpec::load(&source.0) {
            Ok(spec) => map.0 = spec,
            Err(e) => warn!("Keeping previous map: {e}"),
        }
    }

    for entity in &existing {
        commands.entity(entity).try_despawn();
    }
    obstacles.0 = map.0.obstacle_rects();
    clock.reset();
    let boss = spawn_match(&mut commands, &map.0, &tuning);
    info!("Match started for {nickname}");
    *session = MatchSession::begin(nickname, boss);
}

// ── Resolution ──────────────────────────────────────────────────────

/// Resolve: leave `Running` at most once. Player death wins a tie with boss defeat.
pub fn evaluate_match(
    clock: Res<FrameClock>,
    mut session: ResMut<MatchSession>,
    mut ended: MessageWriter<MatchEnded>,
) {
    if session.status != MatchStatus::Running {
        return;
    }
    let (status, result) = if session.player_hit {
        (MatchStatus::PlayerDead, MatchResult::Lose)
    } else if session.boss_down {
        (MatchStatus::BossDefeated, MatchResult::Win)
    } else {
        return;
    };

    session.status = status;
    info!("Match over: {:?} after {:.2}s", status, clock.elapsed);
    ended.write(MatchEnded {
        nickname: session.nickname.clone(),
        elapsed: clock.elapsed,
        result,
    });
}

/// Report: hand every finished match to the history sink.
pub fn record_match_history(sink: Res<HistorySink>, mut ended: MessageReader<MatchEnded>) {
    for outcome in ended.read() {
        let record = MatchRecord::from(outcome);
        if let Err(e) = sink.0.append(&record) {
            error!("Failed to record match history: {e}");
        }
    }
}

// ── HUD values ──────────────────────────────────────────────────────

/// Numbers the HUD draws. Rebuilt every frame, also while the match is over.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct HudSnapshot {
    pub stamina: f32,
    pub max_stamina: f32,
    pub ammo: f32,
    pub max_ammo: f32,
    /// `(health, max)` while a boss is alive.
    pub boss_health: Option<(u32, u32)>,
    pub elapsed: f32,
    pub status: MatchStatus,
}

pub fn update_hud(
    clock: Res<FrameClock>,
    session: Res<MatchSession>,
    mut hud: ResMut<HudSnapshot>,
    player: Query<(&Stamina, &Ammo), With<Player>>,
    bosses: Query<&Boss>,
) {
    if let Ok((stamina, ammo)) = player.single() {
        hud.stamina = stamina.current;
        hud.max_stamina = stamina.max;
        hud.ammo = ammo.current;
        hud.max_ammo = ammo.max;
    }
    hud.boss_health = session
        .boss
        .and_then(|boss| bosses.get(boss).ok())
        .map(|boss| (boss.health.0, boss.max_health.0));
    hud.elapsed = clock.elapsed;
    hud.status = session.status;
}
