use bevy::prelude::*;
use std::collections::HashMap;

/// Maps tile image references to placeholder colors.
#[derive(Resource, Default)]
pub struct AssetsMap {
    pub tile_colors: HashMap<String, Color>,
}

impl AssetsMap {
    pub fn with_defaults() -> Self {
        let mut map = HashMap::new();
        map.insert("grass".into(), Color::srgb(0.25, 0.55, 0.25));
        map.insert("dirt".into(), Color::srgb(0.45, 0.33, 0.2));
        map.insert("cliff".into(), Color::srgb(0.35, 0.35, 0.4));
        map.insert("water".into(), Color::srgb(0.15, 0.35, 0.7));
        map.insert("tree".into(), Color::srgb(0.1, 0.35, 0.12));
        map.insert("rock".into(), Color::srgb(0.5, 0.5, 0.5));
        Self { tile_colors: map }
    }

    pub fn tile_color(&self, image: &str) -> Color {
        self.tile_colors
            .get(image)
            .copied()
            .unwrap_or(Color::srgb(0.3, 0.3, 0.3))
    }
}

pub const PLAYER_COLOR: Color = Color::srgb(0.2, 0.6, 1.0);
pub const RETICLE_COLOR: Color = Color::srgb(0.2, 1.0, 0.2);
pub const PROJECTILE_COLOR: Color = Color::srgb(1.0, 1.0, 0.2);
pub const ENEMY_COLOR: Color = Color::srgb(0.4, 0.9, 0.3);
pub const BOSS_COLOR: Color = Color::srgb(0.6, 0.2, 0.9);
