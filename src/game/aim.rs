use bevy::prelude::*;

use super::camera::Viewport;
use super::components::*;
use super::intent::Intent;
use crate::config::tuning::Tuning;

/// Aim reticle orbiting the player at a fixed distance.
///
/// `direction` is always unit length. It starts pointing right and keeps its
/// last value whenever the pointer sits exactly on the viewport center.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AimReticle {
    pub direction: Vec2,
    pub distance: f32,
}

impl AimReticle {
    pub fn new(distance: f32) -> Self {
        Self {
            direction: Vec2::X,
            distance,
        }
    }

    /// Where the reticle sits for an anchor (player center).
    pub fn position(&self, anchor: Vec2) -> Vec2 {
        anchor + self.direction * self.distance
    }

    /// The player is always drawn at the viewport center, so the aim
    /// direction is the pointer's offset from that center.
    pub fn aim_at(&mut self, pointer: Vec2, viewport: Vec2) {
        if let Some(dir) = (pointer - viewport * 0.5).try_normalize() {
            self.direction = dir;
        }
    }
}

pub fn reticle_bundle(anchor: Vec2, tuning: &Tuning) -> impl Bundle {
    let reticle = AimReticle::new(tuning.reticle_distance);
    (
        reticle,
        InMatch,
        Body::new(reticle.position(anchor), tuning.reticle_size()),
    )
}

/// Recompute aim direction from the pointer and pin the reticle to the player.
pub fn update_aim(
    intent: Res<Intent>,
    viewport: Res<Viewport>,
    player: Query<&Body, (With<Player>, Without<AimReticle>)>,
    mut reticles: Query<(&mut AimReticle, &mut Body)>,
) {
    let Ok(player) = player.single() else {
        return;
    };
    for (mut reticle, mut body) in &mut reticles {
        if let Some(pointer) = intent.pointer {
            reticle.aim_at(pointer, viewport.0);
        }
        let shift = reticle.position(player.center) - body.center;
        body.translate(shift);
    }
}
