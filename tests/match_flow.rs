//! Headless match tests: drive the simulation frame by frame with a fixed delta.

use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use time_runner::game::{
    SimulationPlugin,
    boss::Boss,
    clock::FrameClock,
    components::{Body, Mover, Player},
    enemy::Enemy,
    events::MatchCommand,
    intent::Intent,
    map::{LoadedMap, MapSource, MapSpec, ObstacleSpec, SpawnKind, SpawnPoint},
    match_state::{HudSnapshot, MatchSession, MatchStatus},
    projectile::Projectile,
    types::MatchResult,
};
use time_runner::storage::history::{HistoryError, HistorySink, MatchHistory, MatchRecord};

const DT: f32 = 0.25;

/// History sink that keeps records in memory.
#[derive(Clone, Default)]
struct MemoryHistory(Arc<Mutex<Vec<MatchRecord>>>);

impl MatchHistory for MemoryHistory {
    fn append(&self, record: &MatchRecord) -> Result<(), HistoryError> {
        self.0.lock().unwrap().push(record.clone());
        Ok(())
    }
}

impl MemoryHistory {
    fn records(&self) -> Vec<MatchRecord> {
        self.0.lock().unwrap().clone()
    }
}

fn map(spawns: &[(SpawnKind, f32, f32)], obstacles: &[ObstacleSpec]) -> MapSpec {
    MapSpec {
        tile_size: 64.0,
        layers: vec![],
        obstacles: obstacles.to_vec(),
        spawns: spawns
            .iter()
            .map(|&(kind, x, y)| SpawnPoint { kind, x, y })
            .collect(),
    }
}

/// Headless app with an in-memory history and no match started yet.
fn headless(spec: MapSpec) -> (App, MemoryHistory) {
    let history = MemoryHistory::default();
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(SimulationPlugin);
    app.insert_resource(LoadedMap(spec));
    app.insert_resource(HistorySink(Box::new(history.clone())));
    (app, history)
}

fn start_command(nickname: &str) -> MatchCommand {
    MatchCommand::Start {
        nickname: nickname.into(),
    }
}

/// Headless app already one frame into a match.
fn start(spec: MapSpec) -> (App, MemoryHistory) {
    let (mut app, history) = headless(spec);
    app.world_mut().write_message(start_command("tester"));
    step(&mut app);
    (app, history)
}

fn step(app: &mut App) {
    app.world_mut().resource_mut::<FrameClock>().delta = DT;
    app.update();
}

fn status(app: &App) -> MatchStatus {
    app.world().resource::<MatchSession>().status
}

fn elapsed(app: &App) -> f32 {
    app.world().resource::<FrameClock>().elapsed
}

fn player_body(app: &mut App) -> Body {
    let world = app.world_mut();
    let mut query = world.query_filtered::<&Body, With<Player>>();
    *query.single(world).unwrap()
}

fn count<T: Component>(app: &mut App) -> usize {
    let world = app.world_mut();
    let mut query = world.query_filtered::<Entity, With<T>>();
    query.iter(world).count()
}

#[test]
fn start_spawns_map_entities_and_runs_clock() {
    let (mut app, _) = start(map(
        &[
            (SpawnKind::Player, 100.0, 100.0),
            (SpawnKind::Enemy, 900.0, 100.0),
            (SpawnKind::Enemy, 900.0, 700.0),
            (SpawnKind::Boss, 1500.0, 1500.0),
        ],
        &[],
    ));
    assert_eq!(status(&app), MatchStatus::Running);
    assert_eq!(elapsed(&app), DT);
    assert_eq!(count::<Player>(&mut app), 1);
    assert_eq!(count::<Enemy>(&mut app), 2);
    assert_eq!(count::<Boss>(&mut app), 1);
    assert_eq!(app.world().resource::<HudSnapshot>().boss_health, Some((5, 5)));
}

#[test]
fn player_stops_at_obstacle_edge() {
    let wall = ObstacleSpec {
        x: 130.0,
        y: 0.0,
        width: 70.0,
        height: 200.0,
    };
    let (mut app, _) = start(map(&[(SpawnKind::Player, 100.0, 100.0)], &[wall]));
    assert_eq!(player_body(&mut app).hitbox.max.x, 119.5);

    app.world_mut().resource_mut::<Intent>().move_axis = Vec2::X;
    app.world_mut().resource_mut::<FrameClock>().delta = 0.1;
    app.update();

    let body = player_body(&mut app);
    assert_eq!(body.hitbox.max.x, 130.0);
    assert_eq!(body.center, body.hitbox.center());
}

#[test]
fn boss_takes_one_damage_per_hit_and_wins_once() {
    let (mut app, history) = start(map(
        &[(SpawnKind::Player, 100.0, 100.0), (SpawnKind::Boss, 400.0, 100.0)],
        &[],
    ));
    app.world_mut().resource_mut::<Intent>().fire = true;

    let mut observed = vec![5];
    for _ in 0..80 {
        step(&mut app);
        let hp = app.world().resource::<HudSnapshot>().boss_health.map(|(hp, _)| hp);
        match hp {
            Some(hp) if observed.last() != Some(&hp) => observed.push(hp),
            _ => {}
        }
    }

    assert_eq!(observed, vec![5, 4, 3, 2, 1]);
    assert_eq!(status(&app), MatchStatus::BossDefeated);
    assert_eq!(count::<Boss>(&mut app), 0);

    let records = history.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].result, MatchResult::Win);
    assert_eq!(records[0].nickname, "tester");
    assert!(records[0].elapsed > 0.0);
}

#[test]
fn enemy_contact_kills_player() {
    let (mut app, history) = start(map(
        &[(SpawnKind::Player, 100.0, 100.0), (SpawnKind::Enemy, 300.0, 100.0)],
        &[],
    ));

    for _ in 0..40 {
        if status(&app) != MatchStatus::Running {
            break;
        }
        step(&mut app);
    }
    assert_eq!(status(&app), MatchStatus::PlayerDead);
    assert_eq!(history.records().len(), 1);
    assert_eq!(history.records()[0].result, MatchResult::Lose);
}

#[test]
fn player_death_beats_boss_defeat_in_same_frame() {
    let (mut app, history) = start(map(
        &[(SpawnKind::Player, 100.0, 100.0), (SpawnKind::Boss, 900.0, 100.0)],
        &[],
    ));
    {
        let mut session = app.world_mut().resource_mut::<MatchSession>();
        session.player_hit = true;
        session.boss_down = true;
    }
    step(&mut app);

    assert_eq!(status(&app), MatchStatus::PlayerDead);
    assert_eq!(history.records().len(), 1);
    assert_eq!(history.records()[0].result, MatchResult::Lose);
}

#[test]
fn terminal_state_freezes_simulation_until_restart() {
    let (mut app, history) = start(map(
        &[(SpawnKind::Player, 100.0, 100.0), (SpawnKind::Enemy, 300.0, 100.0)],
        &[],
    ));

    // Restart is ignored while the match is still running.
    app.world_mut().write_message(MatchCommand::Restart);
    step(&mut app);
    assert_eq!(elapsed(&app), 2.0 * DT);

    while status(&app) == MatchStatus::Running {
        step(&mut app);
    }
    let frozen_at = elapsed(&app);
    let frozen_body = player_body(&mut app);

    {
        let mut intent = app.world_mut().resource_mut::<Intent>();
        intent.move_axis = Vec2::new(1.0, 1.0);
        intent.sprint = true;
        intent.fire = true;
    }
    for _ in 0..10 {
        step(&mut app);
    }
    assert_eq!(status(&app), MatchStatus::PlayerDead);
    assert_eq!(elapsed(&app), frozen_at);
    assert_eq!(player_body(&mut app), frozen_body);
    assert_eq!(count::<Projectile>(&mut app), 0);
    assert_eq!(history.records().len(), 1);

    *app.world_mut().resource_mut::<Intent>() = Intent::default();
    app.world_mut().write_message(MatchCommand::Restart);
    step(&mut app);

    assert_eq!(status(&app), MatchStatus::Running);
    assert_eq!(elapsed(&app), DT);
    assert_eq!(player_body(&mut app).center, Vec2::new(100.0, 100.0));
    assert_eq!(count::<Player>(&mut app), 1);
    assert_eq!(count::<Enemy>(&mut app), 1);
    assert_eq!(app.world().resource::<MatchSession>().nickname, "tester");
    assert_eq!(history.records().len(), 1);
}

#[test]
fn unhit_projectile_expires_at_lifetime() {
    let (mut app, _) = start(map(&[(SpawnKind::Player, 100.0, 100.0)], &[]));
    assert_eq!(count::<Projectile>(&mut app), 0);

    // Fired on the frame ending at t = 0.5, lives for 1.5 s.
    app.world_mut().resource_mut::<Intent>().fire = true;
    step(&mut app);
    app.world_mut().resource_mut::<Intent>().fire = false;
    assert_eq!(count::<Projectile>(&mut app), 1);

    while elapsed(&app) < 1.75 {
        step(&mut app);
        assert_eq!(count::<Projectile>(&mut app), 1, "alive at t={}", elapsed(&app));
    }
    step(&mut app);
    assert_eq!(elapsed(&app), 2.0);
    assert_eq!(count::<Projectile>(&mut app), 0);
}

#[test]
fn quit_requests_app_exit() {
    let (mut app, _) = start(map(&[(SpawnKind::Player, 100.0, 100.0)], &[]));
    app.world_mut().write_message(MatchCommand::Quit);
    step(&mut app);
    assert_eq!(app.should_exit(), Some(AppExit::Success));
}

#[test]
fn two_starts_in_one_frame_spawn_one_match() {
    let (mut app, _) = headless(map(
        &[
            (SpawnKind::Player, 100.0, 100.0),
            (SpawnKind::Enemy, 900.0, 100.0),
            (SpawnKind::Boss, 1500.0, 1500.0),
        ],
        &[],
    ));
    app.world_mut().write_message(start_command("first"));
    app.world_mut().write_message(start_command("second"));
    step(&mut app);

    assert_eq!(count::<Player>(&mut app), 1);
    assert_eq!(count::<Enemy>(&mut app), 1);
    assert_eq!(count::<Boss>(&mut app), 1);
    let session = app.world().resource::<MatchSession>();
    assert_eq!(session.nickname, "second");
    assert_eq!(session.status, MatchStatus::Running);

    // Still a single, resolvable match: contact with the player ends it.
    app.world_mut().resource_mut::<MatchSession>().player_hit = true;
    step(&mut app);
    assert_eq!(status(&app), MatchStatus::PlayerDead);
}

#[test]
fn restart_and_start_in_one_frame_respawn_once() {
    let (mut app, _) = start(map(
        &[(SpawnKind::Player, 100.0, 100.0), (SpawnKind::Enemy, 900.0, 100.0)],
        &[],
    ));
    app.world_mut().resource_mut::<MatchSession>().player_hit = true;
    step(&mut app);
    assert_eq!(status(&app), MatchStatus::PlayerDead);

    app.world_mut().write_message(MatchCommand::Restart);
    app.world_mut().write_message(start_command("again"));
    step(&mut app);

    assert_eq!(status(&app), MatchStatus::Running);
    assert_eq!(count::<Player>(&mut app), 1);
    assert_eq!(count::<Enemy>(&mut app), 1);
    assert_eq!(app.world().resource::<MatchSession>().nickname, "again");
}

#[test]
fn enemy_stalls_at_obstacle_while_chasing() {
    let wall = ObstacleSpec {
        x: 250.0,
        y: 0.0,
        width: 20.0,
        height: 200.0,
    };
    let (mut app, _) = start(map(
        &[(SpawnKind::Player, 100.0, 100.0), (SpawnKind::Enemy, 400.0, 100.0)],
        &[wall],
    ));

    for _ in 0..10 {
        step(&mut app);
    }

    assert_eq!(status(&app), MatchStatus::Running);
    let world = app.world_mut();
    let mut query = world.query_filtered::<(&Body, &Mover), With<Enemy>>();
    let (body, mover) = query.single(world).unwrap();
    assert_eq!(body.hitbox.min.x, 270.0);
    assert_eq!(body.center.y, 100.0);
    assert_eq!(mover.direction, Vec2::new(-1.0, 0.0));
}

#[test]
fn restart_reloads_map_from_its_file() {
    let dir = std::env::temp_dir().join(format!("time_runner_map_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("level.ron");
    let write_map = |enemies: &[(f32, f32)]| {
        let mut spawns = vec![(SpawnKind::Player, 100.0, 100.0)];
        spawns.extend(enemies.iter().map(|&(x, y)| (SpawnKind::Enemy, x, y)));
        std::fs::write(&path, ron::ser::to_string(&map(&spawns, &[])).unwrap()).unwrap();
    };

    write_map(&[(900.0, 100.0)]);
    let (mut app, _) = headless(map(&[(SpawnKind::Player, 100.0, 100.0)], &[]));
    app.insert_resource(MapSource(path.clone()));
    app.world_mut().write_message(start_command("tester"));
    step(&mut app);
    assert_eq!(count::<Enemy>(&mut app), 1);

    app.world_mut().resource_mut::<MatchSession>().player_hit = true;
    step(&mut app);
    write_map(&[(900.0, 100.0), (900.0, 700.0), (100.0, 700.0)]);
    app.world_mut().write_message(MatchCommand::Restart);
    step(&mut app);

    assert_eq!(status(&app), MatchStatus::Running);
    assert_eq!(count::<Enemy>(&mut app), 3);

    // A broken file keeps the last good map.
    app.world_mut().resource_mut::<MatchSession>().player_hit = true;
    step(&mut app);
    std::fs::write(&path, "not a map").unwrap();
    app.world_mut().write_message(MatchCommand::Restart);
    step(&mut app);
    assert_eq!(count::<Enemy>(&mut app), 3);

    let _ = std::fs::remove_dir_all(&dir);
}
