/// Collaborator traits consumed by the playback engine
use crate::error::{CatalogError, OutputError};
use crate::types::{OutputHandle, StreamRef, TrackId};
use async_trait::async_trait;

/// Catalog Service
///
/// Resolves a track into a playable stream. Implementations typically call a
/// remote API; the call may take unbounded time and may fail for network,
/// authorization or not-found reasons. The engine treats every failure the
/// same way and only uses the rendered message.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Resolve the playable stream for a track
    ///
    /// # Errors
    /// Returns a `CatalogError` if the stream cannot be resolved
    async fn resolve_stream(&self, track_id: &TrackId) -> Result<StreamRef, CatalogError>;
}

/// Audio output adapter
///
/// Owns decoding and the output buffer. The engine drives it from its tick and
/// never reaches into its internals: it starts a stream, adjusts volume,
/// pauses/resumes/stops it, and polls elapsed time, start confirmation, the
/// finished flag and the error channel once per tick.
pub trait AudioOutput: Send {
    /// Begin buffered playback of a resolved stream
    ///
    /// Returning `Ok` means the stream was accepted, not that audio is
    /// audible yet; see [`AudioOutput::is_playing`].
    ///
    /// # Errors
    /// Returns an error if the backend refuses the stream
    fn start_streaming(&mut self, stream: &StreamRef) -> Result<OutputHandle, OutputError>;

    /// Halt output, keeping the position
    fn pause(&mut self, handle: OutputHandle);

    /// Continue output after [`AudioOutput::pause`]
    fn resume(&mut self, handle: OutputHandle);

    /// Set the output volume (0.0 = silent, 1.0 = full volume)
    fn set_volume(&mut self, handle: OutputHandle, volume: f32);

    /// Seconds of the stream played so far
    fn elapsed_seconds(&self, handle: OutputHandle) -> f64;

    /// Whether the stream is actively outputting audio (buffering finished)
    fn is_playing(&self, handle: OutputHandle) -> bool;

    /// Whether the stream reached its natural end
    fn has_finished(&self, handle: OutputHandle) -> bool;

    /// Stop the stream and release its resources
    fn stop(&mut self, handle: OutputHandle);

    /// Take an asynchronous failure reported since the last call
    fn take_error(&mut self, handle: OutputHandle) -> Option<OutputError> {
        let _ = handle;
        None
    }
}
