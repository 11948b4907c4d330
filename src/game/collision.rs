use bevy::prelude::*;
use std::collections::HashSet;

use super::boss::Boss;
use super::components::*;
use super::enemy::Enemy;
use super::match_state::MatchSession;
use super::projectile::Projectile;

/// Static obstacle rectangles for the current match, in map order.
#[derive(Resource, Debug, Clone, Default)]
pub struct ObstacleSet(pub Vec<Rect>);

/// Strict AABB overlap: touching edges do not count.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

/// Advance `hitbox` by `delta`, resolving each axis separately against `obstacles`.
///
/// Horizontal first, then vertical. Every overlapping obstacle clamps the
/// leading edge; when obstacles overlap each other the last one checked wins.
pub fn move_and_collide(hitbox: &mut Rect, delta: Vec2, obstacles: &[Rect]) {
    shift(hitbox, Vec2::new(delta.x, 0.0));
    for obstacle in obstacles {
        if !overlaps(hitbox, obstacle) {
            continue;
        }
        let width = hitbox.width();
        if delta.x > 0.0 {
            hitbox.max.x = obstacle.min.x;
            hitbox.min.x = hitbox.max.x - width;
        } else if delta.x < 0.0 {
            hitbox.min.x = obstacle.max.x;
            hitbox.max.x = hitbox.min.x + width;
        }
    }

    shift(hitbox, Vec2::new(0.0, delta.y));
    for obstacle in obstacles {
        if !overlaps(hitbox, obstacle) {
            continue;
        }
        let height = hitbox.height();
        if delta.y < 0.0 {
            hitbox.min.y = obstacle.max.y;
            hitbox.max.y = hitbox.min.y + height;
        } else if delta.y > 0.0 {
            hitbox.max.y = obstacle.min.y;
            hitbox.min.y = hitbox.max.y - height;
        }
    }
}

fn shift(rect: &mut Rect, by: Vec2) {
    rect.min += by;
    rect.max += by;
}

/// Projectile–Enemy collisions: a projectile dies on contact and takes every
/// enemy it overlaps with it.
pub fn projectile_enemy_hits(
    mut commands: Commands,
    projectiles: Query<(Entity, &Body), With<Projectile>>,
    enemies: Query<(Entity, &Body), With<Enemy>>,
) {
    let enemy_list: Vec<_> = enemies.iter().collect();
    let mut killed: HashSet<Entity> = HashSet::new();

    for (proj_entity, proj_body) in &projectiles {
        let proj_rect = proj_body.visual_rect();
        let hits: Vec<Entity> = enemy_list
            .iter()
            .filter(|(enemy, body)| !killed.contains(enemy) && overlaps(&proj_rect, &body.hitbox))
            .map(|(enemy, _)| *enemy)
            .collect();

        if hits.is_empty() {
            continue;
        }

        commands.entity(proj_entity).try_despawn();
        for enemy in hits {
            commands.entity(enemy).try_despawn();
            killed.insert(enemy);
        }
    }
}

/// Player–Enemy and Player–Boss contact: flags the player as hit.
pub fn player_contact(
    mut session: ResMut<MatchSession>,
    player: Query<&Body, With<Player>>,
    enemies: Query<&Body, With<Enemy>>,
    bosses: Query<&Body, With<Boss>>,
) {
    let Ok(player_body) = player.single() else {
        return;
    };
    let hitbox = player_body.hitbox;

    let touched_enemy = enemies.iter().any(|enemy| overlaps(&hitbox, &enemy.hitbox));
    let touched_boss = bosses.iter().any(|boss| overlaps(&hitbox, &boss.visual_rect()));

    if touched_enemy || touched_boss {
        session.player_hit = true;
    }
}
