//! Player state machine
//!
//! ```text
//! None ──load──▶ Ready ──output started──▶ Playing ──pause──▶ Paused
//!                  │                         ▲                  │
//!                  │                         └──────resume──────┘
//!                  └──failure──▶ Failed  (also from Playing/Paused)
//! ```
//!
//! Loading a new item is allowed from every state and always goes through
//! `Ready`. Failures are only possible while something is loaded.

use crate::error::{PlaybackError, Result};
use crate::types::PlayerState;

/// Validates and records player state transitions
#[derive(Debug, Clone)]
pub struct PlayerStateMachine {
    state: PlayerState,
}

impl Default for PlayerStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerStateMachine {
    /// Start in `None`
    pub fn new() -> Self {
        Self {
            state: PlayerState::None,
        }
    }

    /// Current state
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Whether `from -> to` is a legal change
    pub fn can_transition(from: PlayerState, to: PlayerState) -> bool {
        use PlayerState as S;

        match (from, to) {
            // New item loaded, or stopped back to position 0
            (_, S::Ready) => true,
            // Playlist emptied
            (_, S::None) => true,
            (S::Ready | S::Paused, S::Playing) => true,
            // Direct play request without a load step
            (S::None | S::Failed, S::Playing) => true,
            (S::Playing, S::Paused) => true,
            (S::Ready | S::Playing | S::Paused, S::Failed) => true,
            _ => false,
        }
    }

    /// Move to `to`
    ///
    /// Returns `Ok(true)` if the state changed, `Ok(false)` if it was already
    /// `to` (nothing to notify).
    pub fn transition(&mut self, to: PlayerState) -> Result<bool> {
        if self.state == to {
            return Ok(false);
        }

        if !Self::can_transition(self.state, to) {
            return Err(PlaybackError::InvalidTransition {
                from: self.state,
                to,
            });
        }

        self.state = to;
        Ok(true)
    }
}
