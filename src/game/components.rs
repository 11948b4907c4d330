use bevy::prelude::*;

// ── Marker components ───────────────────────────────────────────────

#[derive(Component)]
pub struct Player;

/// Marker: tag all match entities for teardown on restart.
#[derive(Component)]
pub struct InMatch;

// ── App phase state ─────────────────────────────────────────────────

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppPhase {
    #[default]
    MainMenu,
    InMatch,
}

// ── Spatial state ───────────────────────────────────────────────────

/// Position and bounds of anything that lives on the map.
///
/// Coordinates are map pixels with y growing downward. `hitbox` drives
/// collision resolution and may be smaller than the sprite rectangle.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub center: Vec2,
    pub size: Vec2,
    pub hitbox: Rect,
}

impl Body {
    /// Body whose hitbox matches its sprite rectangle.
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            size,
            hitbox: Rect::from_center_size(center, size),
        }
    }

    /// Body with a hitbox shrunk by `inset` in total per axis.
    pub fn with_hitbox_inset(center: Vec2, size: Vec2, inset: Vec2) -> Self {
        Self {
            center,
            size,
            hitbox: Rect::from_center_size(center, (size - inset).max(Vec2::ZERO)),
        }
    }

    pub fn visual_rect(&self) -> Rect {
        Rect::from_center_size(self.center, self.size)
    }

    /// Re-center the sprite on the (possibly corrected) hitbox.
    pub fn sync_to_hitbox(&mut self) {
        self.center = self.hitbox.center();
    }

    /// Move sprite and hitbox together, without collision.
    pub fn translate(&mut self, delta: Vec2) {
        self.center += delta;
        self.hitbox.min += delta;
        self.hitbox.max += delta;
    }
}

/// Movement direction (unit length or zero) and current speed.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Mover {
    pub direction: Vec2,
    pub speed: f32,
}

impl Mover {
    pub fn displacement(&self, dt: f32) -> Vec2 {
        self.direction * self.speed * dt
    }
}

/// Background tile: purely visual, drawn in layer order.
#[derive(Component, Debug, Clone)]
pub struct Tile {
    pub image: String,
    pub layer: usize,
}
