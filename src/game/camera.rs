use bevy::prelude::*;

use super::components::*;

/// Size of the visible area in pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Viewport(pub Vec2);

impl Default for Viewport {
    fn default() -> Self {
        Self(Vec2::new(1280.0, 720.0))
    }
}

/// Offset added to map positions so the tracked entity lands on the viewport center.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraOffset(pub Vec2);

pub fn camera_offset(target: Vec2, viewport: Vec2) -> Vec2 {
    -(target - viewport * 0.5)
}

/// Track the player. The offset is left untouched when there is no player.
pub fn update_camera_offset(
    viewport: Res<Viewport>,
    mut offset: ResMut<CameraOffset>,
    player: Query<&Body, With<Player>>,
) {
    if let Ok(body) = player.single() {
        offset.0 = camera_offset(body.center, viewport.0);
    }
}
