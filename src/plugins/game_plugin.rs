use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::assets_map::*;
use crate::config::tuning::Tuning;
use crate::game::{
    SimSet, SimulationPlugin,
    aim::AimReticle,
    boss::Boss,
    camera::{CameraOffset, Viewport},
    clock,
    components::*,
    enemy::Enemy,
    events::MatchCommand,
    intent::Intent,
    map::{LoadedMap, MapSource, MapSpec},
    match_state::MatchSession,
    projectile::Projectile,
};

/// Windowed front end: input, frame clock, camera and placeholder sprites.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(SimulationPlugin);
        app.init_state::<AppPhase>();
        app.insert_resource(AssetsMap::with_defaults());

        app.add_systems(Startup, (setup_camera, load_map));

        // Input and frame time feed the simulation before its command set.
        app.add_systems(
            Update,
            (clock::drive_frame_clock, read_intent, terminal_input)
                .chain()
                .before(SimSet::CommandSet)
                .run_if(in_state(AppPhase::InMatch)),
        );

        app.add_systems(
            Update,
            (attach_sprites, sync_transforms, follow_camera)
                .chain()
                .after(SimSet::ReportSet),
        );

        // ── Always-on ──
        app.add_systems(Update, tuning_reload_input);
    }
}

// ── Startup ─────────────────────────────────────────────────────────

fn setup_camera(mut commands: Commands, tuning: Res<Tuning>) {
    commands.spawn(Camera2d);
    commands.insert_resource(Viewport(tuning.viewport()));
}

/// A map that fails to load is fatal: nothing can be played without it.
fn load_map(mut commands: Commands, tuning: Res<Tuning>, mut exit: MessageWriter<AppExit>) {
    match MapSpec::load(&tuning.map_path) {
        Ok(spec) => {
            info!(
                "Loaded map {} ({} obstacles, {} spawns)",
                tuning.map_path,
                spec.obstacles.len(),
                spec.spawns.len()
            );
            commands.insert_resource(LoadedMap(spec));
            commands.insert_resource(MapSource(tuning.map_path.clone().into()));
        }
        Err(e) => {
            error!("{e}");
            exit.write(AppExit::error());
        }
    }
}

// ── Input ───────────────────────────────────────────────────────────

fn read_intent(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<Viewport>,
    mut intent: ResMut<Intent>,
) {
    let axis = |neg: KeyCode, pos: KeyCode| {
        keyboard.pressed(pos) as i32 as f32 - keyboard.pressed(neg) as i32 as f32
    };
    intent.move_axis = Vec2::new(axis(KeyCode::KeyA, KeyCode::KeyD), axis(KeyCode::KeyW, KeyCode::KeyS));
    intent.sprint = keyboard.pressed(KeyCode::Space);
    intent.fire = mouse.pressed(MouseButton::Left);

    if let Ok(window) = windows.single() {
        viewport.0 = Vec2::new(window.width(), window.height());
        // Window cursor coordinates are already y-down from the top-left corner.
        intent.pointer = window.cursor_position();
    }
}

/// R restarts and Q quits, only once the match is over.
fn terminal_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    session: Res<MatchSession>,
    mut requests: MessageWriter<MatchCommand>,
) {
    if !session.status.is_terminal() {
        return;
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        requests.write(MatchCommand::Restart);
    } else if keyboard.just_pressed(KeyCode::KeyQ) {
        requests.write(MatchCommand::Quit);
    }
}

// ── Rendering ───────────────────────────────────────────────────────

const Z_TILE: f32 = -10.0;
const Z_ENEMY: f32 = 1.0;
const Z_BOSS: f32 = 1.5;
const Z_PLAYER: f32 = 2.0;
const Z_PROJECTILE: f32 = 3.0;
const Z_RETICLE: f32 = 4.0;

/// Give freshly spawned match entities a colored placeholder sprite.
fn attach_sprites(
    mut commands: Commands,
    assets: Res<AssetsMap>,
    added: Query<
        (
            Entity,
            &Body,
            Option<&Tile>,
            Has<Player>,
            Has<AimReticle>,
            Has<Projectile>,
            Has<Enemy>,
            Has<Boss>,
        ),
        Added<Body>,
    >,
) {
    for (entity, body, tile, player, reticle, projectile, enemy, boss) in &added {
        let (color, z) = if let Some(tile) = tile {
            (assets.tile_color(&tile.image), Z_TILE + tile.layer as f32 * 0.01)
        } else if player {
            (PLAYER_COLOR, Z_PLAYER)
        } else if reticle {
            (RETICLE_COLOR, Z_RETICLE)
        } else if projectile {
            (PROJECTILE_COLOR, Z_PROJECTILE)
        } else if enemy {
            (ENEMY_COLOR, Z_ENEMY)
        } else if boss {
            (BOSS_COLOR, Z_BOSS)
        } else {
            continue;
        };
        commands.entity(entity).insert((
            Sprite::from_color(color, body.size),
            Transform::from_translation(map_to_world(body.center).extend(z)),
        ));
    }
}

/// Map pixels are y-down, the world is y-up.
fn map_to_world(p: Vec2) -> Vec2 {
    Vec2::new(p.x, -p.y)
}

fn sync_transforms(mut query: Query<(&Body, Option<&AimReticle>, &mut Transform)>) {
    for (body, reticle, mut tf) in &mut query {
        let p = map_to_world(body.center);
        tf.translation.x = p.x;
        tf.translation.y = p.y;
        if let Some(reticle) = reticle {
            let dir = map_to_world(reticle.direction);
            tf.rotation = Quat::from_rotation_z(dir.y.atan2(dir.x));
        }
    }
}

/// Place the camera so the tracked entity sits at the viewport center.
fn follow_camera(
    offset: Res<CameraOffset>,
    viewport: Res<Viewport>,
    mut cameras: Query<&mut Transform, (With<Camera2d>, Without<Body>)>,
) {
    let center = map_to_world(viewport.0 * 0.5 - offset.0);
    for mut tf in &mut cameras {
        tf.translation.x = center.x;
        tf.translation.y = center.y;
    }
}

// ── Always-on ───────────────────────────────────────────────────────

/// Reload tuning with F5.
fn tuning_reload_input(keyboard: Res<ButtonInput<KeyCode>>, mut tuning: ResMut<Tuning>) {
    if keyboard.just_pressed(KeyCode::F5) {
        tuning.reload();
    }
}
