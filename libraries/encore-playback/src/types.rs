//! Core types for playback management

use encore_core::{ReleaseId, Track};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{PlaybackError, Result};

/// Player state
///
/// Exactly one value at a time. `None` and `Failed` are the only states
/// reachable without an active track; `Failed` is left by issuing a new play
/// command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerState {
    /// Nothing has ever been loaded
    None,

    /// Track is current and loading (or stopped at position 0)
    Ready,

    /// Audio is being output
    Playing,

    /// Paused mid-track (output halts once the fade-out completes)
    Paused,

    /// Stream resolution or output failed
    Failed,
}

/// What the engine does when the output reports a track finished on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishedPolicy {
    /// Play the next track; stop at position 0 after the last one
    #[default]
    AutoAdvance,

    /// Always stop at position 0 of the finished track
    Stop,
}

/// Configuration for the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0-100, default: 80)
    pub volume: u8,

    /// Fade-in duration on start/resume in milliseconds (default: 400)
    pub fade_in_ms: u64,

    /// Fade-out duration on pause in milliseconds (default: 200)
    pub fade_out_ms: u64,

    /// Track-finished policy (default: auto-advance)
    pub finished_policy: FinishedPolicy,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 80,
            fade_in_ms: 400,
            fade_out_ms: 200,
            finished_policy: FinishedPolicy::AutoAdvance,
        }
    }
}

impl PlaybackConfig {
    /// Fade-in duration
    pub fn fade_in(&self) -> Duration {
        Duration::from_millis(self.fade_in_ms)
    }

    /// Fade-out duration
    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.volume > 100 {
            return Err(PlaybackError::Config(format!(
                "volume must be within 0-100, got {}",
                self.volume
            )));
        }
        Ok(())
    }
}

/// Read-only view of the engine handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub state: PlayerState,
    pub playlist: Vec<Track>,
    pub current_index: Option<usize>,
    pub current_release: Option<ReleaseId>,
    pub can_move_forward: bool,
    pub can_move_back: bool,
    pub elapsed: Duration,
    pub volume: u8,
    pub muted: bool,
    pub last_error: Option<String>,
    pub player_width: f32,
}

impl PlaybackSnapshot {
    /// Track at the current index
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.playlist.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.volume, 80);
        assert_eq!(config.fade_in(), Duration::from_millis(400));
        assert_eq!(config.fade_out(), Duration::from_millis(200));
        assert_eq!(config.finished_policy, FinishedPolicy::AutoAdvance);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_out_of_range_volume() {
        let config = PlaybackConfig {
            volume: 140,
            ..PlaybackConfig::default()
        };
        assert!(matches!(config.validate(), Err(PlaybackError::Config(_))));
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: PlaybackConfig =
            serde_json::from_str(r#"{"fade_out_ms": 50, "finished_policy": "stop"}"#).unwrap();
        assert_eq!(config.fade_out_ms, 50);
        assert_eq!(config.fade_in_ms, 400);
        assert_eq!(config.finished_policy, FinishedPolicy::Stop);
    }
}
