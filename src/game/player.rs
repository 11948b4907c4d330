use bevy::prelude::*;

use super::clock::FrameClock;
use super::collision::{ObstacleSet, move_and_collide};
use super::components::*;
use super::intent::Intent;
use super::types::Seconds;
use crate::config::tuning::Tuning;

// ── Stamina ─────────────────────────────────────────────────────────

/// Sprint resource with a forced cooldown once it runs dry.
///
/// Sprinting is allowed only while `current > 0` and the cooldown is idle.
/// Hitting zero starts a fixed cooldown; sprint re-arms when that timer has
/// run out and some stamina has come back, no matter how much.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Stamina {
    pub current: f32,
    pub max: f32,
    pub depletion_per_sec: f32,
    pub regen_per_sec: f32,
    pub cooldown: Seconds,
    pub cooldown_duration: Seconds,
}

impl Stamina {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            current: tuning.max_stamina,
            max: tuning.max_stamina,
            depletion_per_sec: tuning.stamina_depletion_per_sec,
            regen_per_sec: tuning.stamina_regen_per_sec,
            cooldown: Seconds::ZERO,
            cooldown_duration: Seconds::new(tuning.sprint_cooldown),
        }
    }

    pub fn can_sprint(&self) -> bool {
        self.current > 0.0 && self.cooldown.is_expired()
    }

    /// Advance one frame. Returns whether the boosted speed applies this frame.
    pub fn tick(&mut self, sprint_requested: bool, dt: f32) -> bool {
        let boosted = sprint_requested && self.can_sprint();
        if boosted {
            self.current -= self.depletion_per_sec * dt;
        } else {
            self.current += self.regen_per_sec * dt;
        }

        if self.current <= 0.0 {
            self.current = 0.0;
            if self.cooldown.is_expired() {
                self.cooldown = self.cooldown_duration;
            }
        }

        if !self.cooldown.is_expired() {
            self.cooldown = self.cooldown.dec(dt);
        }

        self.current = self.current.clamp(0.0, self.max);
        boosted
    }
}

// ── Ammo ────────────────────────────────────────────────────────────

/// Fractional ammo that refills linearly up to `max`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Ammo {
    pub current: f32,
    pub max: f32,
    pub regen_per_sec: f32,
}

impl Ammo {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            current: tuning.max_ammo,
            max: tuning.max_ammo,
            regen_per_sec: tuning.ammo_regen_per_sec,
        }
    }

    /// Firing needs a completely refilled magazine.
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub fn regenerate(&mut self, dt: f32) {
        if self.current < self.max {
            self.current += self.regen_per_sec * dt;
        }
        self.current = self.current.clamp(0.0, self.max);
    }

    pub fn spend_one(&mut self) {
        self.current = (self.current - 1.0).max(0.0);
    }
}

// ── Fire control ────────────────────────────────────────────────────

/// Shot cooldown, measured against the match clock and independent of ammo.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct FireControl {
    pub can_fire: bool,
    pub fired_at: f32,
    pub cooldown: f32,
}

impl FireControl {
    pub fn new(cooldown: f32) -> Self {
        Self {
            can_fire: true,
            fired_at: 0.0,
            cooldown,
        }
    }

    pub fn rearm(&mut self, now: f32) {
        if !self.can_fire && now - self.fired_at >= self.cooldown {
            self.can_fire = true;
        }
    }

    /// Consume one round if the weapon is ready. Returns true when a shot goes out.
    pub fn try_fire(&mut self, ammo: &mut Ammo, now: f32) -> bool {
        if !self.can_fire || !ammo.is_full() {
            return false;
        }
        ammo.spend_one();
        self.can_fire = false;
        self.fired_at = now;
        true
    }
}

// ── Spawning ────────────────────────────────────────────────────────

/// Components for a fresh player at `center`.
pub fn player_bundle(center: Vec2, tuning: &Tuning) -> impl Bundle {
    (
        Player,
        InMatch,
        Body::with_hitbox_inset(center, tuning.player_size(), tuning.player_hitbox_inset()),
        Mover {
            direction: Vec2::ZERO,
            speed: tuning.player_speed,
        },
        Stamina::from_tuning(tuning),
        Ammo::from_tuning(tuning),
        FireControl::new(tuning.fire_cooldown),
    )
}

// ── Systems ─────────────────────────────────────────────────────────

/// Restore the ability to fire once the shot cooldown has elapsed.
pub fn rearm_fire_control(clock: Res<FrameClock>, mut query: Query<&mut FireControl, With<Player>>) {
    for mut fire in &mut query {
        fire.rearm(clock.elapsed);
    }
}

/// Stamina, ammo, speed selection and collision-resolved movement.
pub fn update_player(
    tuning: Res<Tuning>,
    clock: Res<FrameClock>,
    intent: Res<Intent>,
    obstacles: Res<ObstacleSet>,
    mut query: Query<(&mut Body, &mut Mover, &mut Stamina, &mut Ammo), With<Player>>,
) {
    let dt = clock.delta;
    for (mut body, mut mover, mut stamina, mut ammo) in &mut query {
        mover.direction = intent.move_direction();
        let boosted = stamina.tick(intent.sprint, dt);
        mover.speed = if boosted {
            tuning.player_boost_speed
        } else {
            tuning.player_speed
        };
        ammo.regenerate(dt);

        let delta = mover.displacement(dt);
        move_and_collide(&mut body.hitbox, delta, &obstacles.0);
        body.sync_to_hitbox();
    }
}
