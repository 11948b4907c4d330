use bevy::prelude::*;

use super::components::*;
use super::events::GameEvent;
use super::match_state::MatchSession;
use super::types::Health;
use crate::config::tuning::Tuning;

/// Stationary damage sink. Its death wins the match.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Boss {
    pub health: Health,
    pub max_health: Health,
}

impl Boss {
    pub fn new(max_health: u32) -> Self {
        Self {
            health: Health(max_health),
            max_health: Health(max_health),
        }
    }

    /// Subtract `amount`, saturating at zero.
    /// Returns true only on the hit that takes health from positive to zero.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = !self.health.is_depleted();
        self.health = self.health.sub_clamped(amount);
        was_alive && self.health.is_depleted()
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_depleted()
    }
}

pub fn boss_bundle(center: Vec2, tuning: &Tuning) -> impl Bundle {
    (Boss::new(tuning.boss_max_health), InMatch, Body::new(center, tuning.boss_size()))
}

/// EventApply: route `DealDamage` into the boss and flag its defeat.
pub fn apply_damage_events(
    mut commands: Commands,
    mut events: MessageReader<GameEvent>,
    mut session: ResMut<MatchSession>,
    mut bosses: Query<&mut Boss>,
) {
    for event in events.read() {
        let GameEvent::DealDamage { target, amount } = event else {
            continue;
        };
        let Ok(mut boss) = bosses.get_mut(*target) else {
            continue;
        };
        if boss.is_dead() {
            continue;
        }
        if boss.take_damage(*amount) {
            info!("Boss defeated");
            session.boss_down = true;
            session.boss = None;
            commands.entity(*target).try_despawn();
        } else {
            debug!("Boss hit, health {}/{}", boss.health.0, boss.max_health.0);
        }
    }
}
