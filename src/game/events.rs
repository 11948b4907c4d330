use bevy::prelude::*;

use super::types::MatchResult;

/// Combat events generated during a frame and applied later in the same frame.
#[derive(Message, Debug, Clone)]
pub enum GameEvent {
    DealDamage { target: Entity, amount: u32 },
    DespawnEntity { entity: Entity },
}

/// Requests coming from the menu and the terminal-state screen.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum MatchCommand {
    Start { nickname: String },
    Restart,
    Quit,
}

/// Written exactly once per match, when it leaves the running state.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct MatchEnded {
    pub nickname: String,
    pub elapsed: f32,
    pub result: MatchResult,
}
