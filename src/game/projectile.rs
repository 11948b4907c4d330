use bevy::prelude::*;

use super::aim::AimReticle;
use super::boss::Boss;
use super::clock::FrameClock;
use super::collision::overlaps;
use super::components::*;
use super::events::GameEvent;
use super::intent::Intent;
use super::match_state::MatchSession;
use super::player::{Ammo, FireControl};
use crate::config::tuning::Tuning;

/// A shot in flight. Straight line, constant speed, fixed lifetime.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub direction: Vec2,
    pub speed: f32,
    /// Match clock reading when the shot left the muzzle.
    pub spawned_at: f32,
    pub lifetime: f32,
    /// Boss to test against, if one existed when the shot was fired.
    pub target: Option<Entity>,
    pub damage: u32,
}

impl Projectile {
    pub fn age(&self, now: f32) -> f32 {
        now - self.spawned_at
    }

    pub fn is_expired(&self, now: f32) -> bool {
        self.age(now) >= self.lifetime
    }
}

pub fn projectile_bundle(
    center: Vec2,
    direction: Vec2,
    now: f32,
    target: Option<Entity>,
    tuning: &Tuning,
) -> impl Bundle {
    (
        Projectile {
            direction,
            speed: tuning.projectile_speed,
            spawned_at: now,
            lifetime: tuning.projectile_lifetime,
            target,
            damage: tuning.projectile_damage,
        },
        InMatch,
        Body::new(center, tuning.projectile_size()),
    )
}

/// Spawn a projectile in front of the reticle when the weapon is ready.
pub fn fire_projectile(
    mut commands: Commands,
    tuning: Res<Tuning>,
    clock: Res<FrameClock>,
    intent: Res<Intent>,
    session: Res<MatchSession>,
    mut player: Query<(&mut FireControl, &mut Ammo), With<Player>>,
    reticles: Query<(&AimReticle, &Body)>,
) {
    if !intent.fire {
        return;
    }
    let Ok((mut fire, mut ammo)) = player.single_mut() else {
        return;
    };
    let Ok((reticle, anchor)) = reticles.single() else {
        return;
    };
    if !fire.try_fire(&mut ammo, clock.elapsed) {
        return;
    }

    let muzzle = anchor.center + reticle.direction * tuning.muzzle_offset;
    commands.spawn(projectile_bundle(
        muzzle,
        reticle.direction,
        clock.elapsed,
        session.boss,
        &tuning,
    ));
}

/// Move shots, expire old ones, and resolve hits on the targeted boss.
///
/// A shot that expires this frame still gets its boss check, so it can land
/// its one point of damage on the way out.
pub fn advance_projectiles(
    clock: Res<FrameClock>,
    mut events: MessageWriter<GameEvent>,
    mut projectiles: Query<(Entity, &Projectile, &mut Body), Without<Boss>>,
    bosses: Query<&Body, With<Boss>>,
) {
    for (entity, projectile, mut body) in &mut projectiles {
        body.translate(projectile.direction * projectile.speed * clock.delta);

        let hit = projectile
            .target
            .and_then(|target| bosses.get(target).ok().map(|boss| (target, boss)))
            .filter(|(_, boss)| overlaps(&body.visual_rect(), &boss.visual_rect()));
        if let Some((target, _)) = hit {
            events.write(GameEvent::DealDamage {
                target,
                amount: projectile.damage,
            });
        }

        if hit.is_some() || projectile.is_expired(clock.elapsed) {
            events.write(GameEvent::DespawnEntity { entity });
        }
    }
}

/// Cleanup: apply deferred despawns.
pub fn handle_despawn_events(mut commands: Commands, mut events: MessageReader<GameEvent>) {
    for event in events.read() {
        if let GameEvent::DespawnEntity { entity } = event {
            commands.entity(*entity).try_despawn();
        }
    }
}
