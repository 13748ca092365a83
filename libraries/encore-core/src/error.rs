//! Error types reported by the engine's external collaborators
use crate::types::{OutputHandle, TrackId};
use thiserror::Error;

/// Failure reported by a Catalog Service while resolving a stream
///
/// The playback engine never branches on the variant; it surfaces the
/// rendered message through the `Failed` state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Transport-level failure (timeout, connection reset, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Credentials missing, expired or rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The catalog has no playable stream for this track
    #[error("Track not found: {0}")]
    NotFound(TrackId),

    /// Anything else the catalog reports
    #[error("{0}")]
    Other(String),
}

/// Failure reported by the audio output adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutputError {
    /// The backend refused to start the stream
    #[error("Stream refused: {0}")]
    Refused(String),

    /// The backend failed while outputting audio
    #[error("Output device error: {0}")]
    Device(String),

    /// The handle does not belong to this adapter (or was already stopped)
    #[error("Unknown output handle: {0}")]
    UnknownHandle(OutputHandle),
}

impl CatalogError {
    /// Create an `Other` error from any message
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
