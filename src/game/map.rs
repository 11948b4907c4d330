use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A level: background tile layers, static obstacles and spawn markers.
///
/// All positions are map pixels with y growing downward. Tile coordinates are
/// grid cells, scaled by `tile_size` when placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSpec {
    pub tile_size: f32,
    #[serde(default)]
    pub layers: Vec<TileLayer>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpec>,
    pub spawns: Vec<SpawnPoint>,
}

/// One drawing layer. Layers are drawn in list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    /// `(grid_x, grid_y, image)` triples.
    pub tiles: Vec<(i32, i32, String)>,
}

/// Collision rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ObstacleSpec {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnKind {
    Player,
    Enemy,
    Boss,
}

/// Spawn marker; the spawned entity is centered on `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub kind: SpawnKind,
    pub x: f32,
    pub y: f32,
}

impl SpawnPoint {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse map {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("map has no player spawn")]
    MissingPlayerSpawn,
    #[error("map has {0} player spawns, expected one")]
    MultiplePlayerSpawns(usize),
    #[error("map has {0} boss spawns, expected at most one")]
    MultipleBossSpawns(usize),
    #[error("obstacle {index} has non-positive size {width}x{height}")]
    DegenerateObstacle { index: usize, width: f32, height: f32 },
}

impl MapSpec {
    /// Read, parse and validate a RON map file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let spec: Self = ron::from_str(&text).map_err(|source| MapError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), MapError> {
        match self.count(SpawnKind::Player) {
            0 => return Err(MapError::MissingPlayerSpawn),
            1 => {}
            n => return Err(MapError::MultiplePlayerSpawns(n)),
        }
        let bosses = self.count(SpawnKind::Boss);
        if bosses > 1 {
            return Err(MapError::MultipleBossSpawns(bosses));
        }
        for (index, obstacle) in self.obstacles.iter().enumerate() {
            if !(obstacle.width > 0.0 && obstacle.height > 0.0) {
                return Err(MapError::DegenerateObstacle {
                    index,
                    width: obstacle.width,
                    height: obstacle.height,
                });
            }
        }
        Ok(())
    }

    fn count(&self, kind: SpawnKind) -> usize {
        self.spawns.iter().filter(|s| s.kind == kind).count()
    }

    fn positions(&self, kind: SpawnKind) -> impl Iterator<Item = Vec2> + '_ {
        self.spawns
            .iter()
            .filter(move |s| s.kind == kind)
            .map(SpawnPoint::position)
    }

    /// First player spawn. `validate` guarantees there is exactly one.
    pub fn player_spawn(&self) -> Option<Vec2> {
        self.positions(SpawnKind::Player).next()
    }

    pub fn boss_spawn(&self) -> Option<Vec2> {
        self.positions(SpawnKind::Boss).next()
    }

    pub fn enemy_spawns(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.positions(SpawnKind::Enemy)
    }

    /// Obstacle rectangles in file order.
    pub fn obstacle_rects(&self) -> Vec<Rect> {
        self.obstacles.iter().map(ObstacleSpec::rect).collect()
    }
}

/// The map every match is spawned from.
#[derive(Resource, Debug, Clone)]
pub struct LoadedMap(pub MapSpec);

/// File the loaded map came from. When present, every match start re-reads it.
#[derive(Resource, Debug, Clone)]
pub struct MapSource(pub PathBuf);

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"(
        tile_size: 64.0,
        layers: [
            (name: "Ground", tiles: [(0, 0, "grass"), (1, 0, "grass")]),
        ],
        obstacles: [
            (x: 128.0, y: 0.0, width: 64.0, height: 192.0),
        ],
        spawns: [
            (kind: Player, x: 32.0, y: 32.0),
            (kind: Enemy, x: 400.0, y: 64.0),
            (kind: Enemy, x: 400.0, y: 300.0),
            (kind: Boss, x: 900.0, y: 500.0),
        ],
    )"#;

    fn sample() -> MapSpec {
        ron::from_str(SAMPLE).unwrap()
    }

    #[test]
    fn parses_spawns_and_obstacles() {
        let spec = sample();
        spec.validate().unwrap();
        assert_eq!(spec.player_spawn(), Some(Vec2::new(32.0, 32.0)));
        assert_eq!(spec.enemy_spawns().count(), 2);
        assert_eq!(spec.boss_spawn(), Some(Vec2::new(900.0, 500.0)));
        assert_eq!(spec.obstacle_rects(), vec![Rect::new(128.0, 0.0, 192.0, 192.0)]);
        assert_eq!(spec.layers[0].tiles[1], (1, 0, "grass".to_string()));
    }

    #[test]
    fn boss_is_optional() {
        let mut spec = sample();
        spec.spawns.retain(|s| s.kind != SpawnKind::Boss);
        spec.validate().unwrap();
        assert_eq!(spec.boss_spawn(), None);
    }

    #[test]
    fn rejects_bad_spawn_counts() {
        let mut spec = sample();
        spec.spawns.retain(|s| s.kind != SpawnKind::Player);
        assert!(matches!(spec.validate(), Err(MapError::MissingPlayerSpawn)));

        let mut spec = sample();
        spec.spawns.push(SpawnPoint { kind: SpawnKind::Player, x: 0.0, y: 0.0 });
        assert!(matches!(spec.validate(), Err(MapError::MultiplePlayerSpawns(2))));

        let mut spec = sample();
        spec.spawns.push(SpawnPoint { kind: SpawnKind::Boss, x: 0.0, y: 0.0 });
        assert!(matches!(spec.validate(), Err(MapError::MultipleBossSpawns(2))));
    }

    #[test]
    fn rejects_degenerate_obstacle() {
        let mut spec = sample();
        spec.obstacles[0].width = 0.0;
        assert!(matches!(
            spec.validate(),
            Err(MapError::DegenerateObstacle { index: 0, .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = MapSpec::load("definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, MapError::Io { .. }));
    }
}
