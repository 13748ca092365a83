//! Error types for playback management

use encore_core::{OutputError, TrackId};
use thiserror::Error;

use crate::types::PlayerState;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The Catalog Service could not resolve a stream
    #[error("Stream resolution failed for track {track_id}: {message}")]
    StreamResolutionFailed {
        /// Track that was being resolved
        track_id: TrackId,
        /// Message reported by the catalog
        message: String,
    },

    /// The output adapter refused the resolved stream
    #[error("Audio output refused the stream: {0}")]
    AdapterStartFailed(#[source] OutputError),

    /// The output adapter failed while playing
    #[error("Audio output error: {0}")]
    Output(#[from] OutputError),

    /// A track was requested but the playlist is empty
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// A resolution result arrived after its request was superseded
    #[error("Discarded stale stream resolution for track {0}")]
    StaleResolutionDiscarded(TrackId),

    /// Cursor is already on the last track
    #[error("Already at the end of the playlist")]
    EndOfPlaylist,

    /// Cursor is already on the first track
    #[error("Already at the start of the playlist")]
    StartOfPlaylist,

    /// State machine rejected a transition
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition {
        /// State before the attempted transition
        from: PlayerState,
        /// Requested state
        to: PlayerState,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
