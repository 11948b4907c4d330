use bevy::prelude::*;

/// Input intent: written by the input layer, consumed by the simulation.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Intent {
    /// Held movement keys as a signed axis vector (not normalized).
    pub move_axis: Vec2,
    /// Whether the player wants to sprint.
    pub sprint: bool,
    /// Whether the player wants to fire; level-triggered, gated by ammo and cooldown.
    pub fire: bool,
    /// Pointer position in viewport coordinates (y down), if known.
    pub pointer: Option<Vec2>,
}

impl Intent {
    /// Movement direction: unit length, or zero when no key is held.
    pub fn move_direction(&self) -> Vec2 {
        self.move_axis.normalize_or_zero()
    }
}
