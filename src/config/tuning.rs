use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All tunable game parameters, loaded from tuning.ron.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub window_width: f32,
    pub window_height: f32,
    /// Upper bound on a single frame's delta, in seconds.
    pub max_frame_delta: f32,
    pub tile_size: f32,

    // ── Player ──
    pub player_size: (f32, f32),
    /// Amount the hitbox is shrunk relative to the sprite, per axis.
    pub player_hitbox_inset: (f32, f32),
    pub player_speed: f32,
    pub player_boost_speed: f32,
    pub max_stamina: f32,
    pub stamina_depletion_per_sec: f32,
    pub stamina_regen_per_sec: f32,
    /// Forced wait after stamina runs dry before sprint re-arms.
    pub sprint_cooldown: f32,
    pub max_ammo: f32,
    pub ammo_regen_per_sec: f32,

    // ── Aim / projectiles ──
    pub reticle_distance: f32,
    pub reticle_size: (f32, f32),
    pub muzzle_offset: f32,
    pub fire_cooldown: f32,
    pub projectile_size: (f32, f32),
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    pub projectile_damage: u32,

    // ── Enemies ──
    pub enemy_size: (f32, f32),
    pub enemy_speed: f32,
    pub boss_size: (f32, f32),
    pub boss_max_health: u32,

    // ── Data ──
    pub map_path: String,
    pub history_file: String,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            window_width: 1280.0,
            window_height: 720.0,
            max_frame_delta: 0.1,
            tile_size: 64.0,
            player_size: (44.0, 64.0),
            player_hitbox_inset: (5.0, 30.0),
            player_speed: 300.0,
            player_boost_speed: 500.0,
            max_stamina: 50.0,
            stamina_depletion_per_sec: 20.0,
            stamina_regen_per_sec: 5.0,
            sprint_cooldown: 1.5,
            max_ammo: 1.0,
            ammo_regen_per_sec: 0.5,
            reticle_distance: 50.0,
            reticle_size: (32.0, 12.0),
            muzzle_offset: 50.0,
            fire_cooldown: 0.8,
            projectile_size: (16.0, 16.0),
            projectile_speed: 600.0,
            projectile_lifetime: 1.5,
            projectile_damage: 1,
            enemy_size: (48.0, 40.0),
            enemy_speed: 110.0,
            boss_size: (128.0, 128.0),
            boss_max_health: 5,
            map_path: "assets/maps/level1.ron".into(),
            history_file: "game_history.csv".into(),
        }
    }
}

impl Tuning {
    /// Get the data directory for tuning and history files.
    pub fn data_dir() -> PathBuf {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("time_runner")
    }

    /// Path to the tuning file.
    pub fn file_path() -> PathBuf {
        Self::data_dir().join("tuning.ron")
    }

    /// Path to the match history log.
    pub fn history_path(&self) -> PathBuf {
        Self::data_dir().join(&self.history_file)
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.window_width, self.window_height)
    }

    pub fn player_size(&self) -> Vec2 {
        Vec2::from(self.player_size)
    }

    pub fn player_hitbox_inset(&self) -> Vec2 {
        Vec2::from(self.player_hitbox_inset)
    }

    pub fn reticle_size(&self) -> Vec2 {
        Vec2::from(self.reticle_size)
    }

    pub fn projectile_size(&self) -> Vec2 {
        Vec2::from(self.projectile_size)
    }

    pub fn enemy_size(&self) -> Vec2 {
        Vec2::from(self.enemy_size)
    }

    pub fn boss_size(&self) -> Vec2 {
        Vec2::from(self.boss_size)
    }

    /// Load from file, or create default if not found.
    pub fn load_or_default() -> Self {
        let path = Self::file_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match ron::from_str(&contents) {
                    Ok(tuning) => return tuning,
                    Err(e) => {
                        warn!("Failed to parse tuning.ron: {e}, using defaults");
                    }
                },
                Err(e) => {
                    warn!("Failed to read tuning.ron: {e}, using defaults");
                }
            }
        }
        let tuning = Self::default();
        tuning.save();
        tuning
    }

    /// Save current tuning to file.
    pub fn save(&self) {
        let path = Self::file_path();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let pretty = ron::ser::PrettyConfig::default();
        match ron::ser::to_string_pretty(self, pretty) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    warn!("Failed to write tuning.ron: {e}");
                }
            }
            Err(e) => {
                warn!("Failed to serialize tuning: {e}");
            }
        }
    }

    /// Reload from file (called by key press).
    pub fn reload(&mut self) {
        *self = Self::load_or_default();
        info!("Tuning reloaded");
    }
}
