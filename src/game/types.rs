use serde::{Deserialize, Serialize};

// ── Newtypes ────────────────────────────────────────────────────────

/// Duration in seconds. Always >= 0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Seconds(pub f32);

impl Seconds {
    pub const ZERO: Self = Self(0.0);

    pub fn new(v: f32) -> Self {
        debug_assert!(v.is_finite(), "Seconds must be finite");
        Self(v.max(0.0))
    }

    /// Decrement by dt, clamped to 0.
    pub fn dec(self, dt: f32) -> Self {
        Self((self.0 - dt).max(0.0))
    }

    pub fn is_expired(self) -> bool {
        self.0 <= 0.0
    }
}

/// Integer hit points. Never observable below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash, Serialize, Deserialize)]
pub struct Health(pub u32);

impl Health {
    pub fn sub_clamped(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }

    pub fn is_depleted(self) -> bool {
        self.0 == 0
    }
}

// ── Enums ───────────────────────────────────────────────────────────

/// How a finished match ended, from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Lose,
}

impl MatchResult {
    /// Label used in the history log.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Lose => "lose",
        }
    }
}
