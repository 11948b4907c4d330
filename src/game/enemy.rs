use bevy::prelude::*;

use super::clock::FrameClock;
use super::collision::{ObstacleSet, move_and_collide};
use super::components::*;
use crate::config::tuning::Tuning;

/// Melee chaser. Walks straight at the player every frame.
#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy;

pub fn enemy_bundle(center: Vec2, tuning: &Tuning) -> impl Bundle {
    (
        Enemy,
        InMatch,
        Body::new(center, tuning.enemy_size()),
        Mover {
            direction: Vec2::ZERO,
            speed: tuning.enemy_speed,
        },
    )
}

/// Unit vector from `from` toward `to`, or `previous` when the two coincide.
pub fn seek_direction(from: Vec2, to: Vec2, previous: Vec2) -> Vec2 {
    (to - from).try_normalize().unwrap_or(previous)
}

/// Steer every enemy at the player and move it through the obstacle set.
pub fn seek_player(
    clock: Res<FrameClock>,
    obstacles: Res<ObstacleSet>,
    player: Query<&Body, (With<Player>, Without<Enemy>)>,
    mut enemies: Query<(&mut Body, &mut Mover), With<Enemy>>,
) {
    let Ok(target) = player.single() else {
        return;
    };
    let target = target.center;

    for (mut body, mut mover) in &mut enemies {
        mover.direction = seek_direction(body.center, target, mover.direction);
        let delta = mover.displacement(clock.delta);
        move_and_collide(&mut body.hitbox, delta, &obstacles.0);
        body.sync_to_hitbox();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_points_at_target() {
        let dir = seek_direction(Vec2::new(10.0, 10.0), Vec2::new(13.0, 14.0), Vec2::ZERO);
        assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-6);
    }

    #[test]
    fn coincident_positions_keep_previous_heading() {
        let previous = Vec2::new(0.0, -1.0);
        assert_eq!(seek_direction(Vec2::splat(5.0), Vec2::splat(5.0), previous), previous);
    }
}
