//! Simulated collaborators
//!
//! Stand-ins for the HTTP catalog and the platform audio output so the engine
//! can run end to end without a network or a sound device. Both run on the
//! Tokio clock, which makes them deterministic under a paused test runtime.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use encore_core::{
    AudioOutput, CatalogError, CatalogService, OutputError, OutputHandle, StreamRef, TrackId,
};
use tokio::time::Instant;
use tracing::debug;

/// Scheme of every stream the simulated catalog hands out
pub const STREAM_SCHEME: &str = "sim://";

/// Catalog that answers after a fixed latency
#[derive(Debug, Clone)]
pub struct SimulatedCatalog {
    latency: Duration,
    failing: HashSet<String>,
}

impl SimulatedCatalog {
    pub fn new(latency: Duration, failing: impl IntoIterator<Item = String>) -> Self {
        Self {
            latency,
            failing: failing.into_iter().collect(),
        }
    }
}

#[async_trait]
impl CatalogService for SimulatedCatalog {
    async fn resolve_stream(&self, track_id: &TrackId) -> Result<StreamRef, CatalogError> {
        tokio::time::sleep(self.latency).await;

        if self.failing.contains(track_id.as_str()) {
            return Err(CatalogError::Network(format!(
                "simulated outage while resolving {}",
                track_id
            )));
        }

        Ok(StreamRef::new(format!("{}{}", STREAM_SCHEME, track_id)))
    }
}

#[derive(Debug)]
struct SimulatedStream {
    ready_at: Instant,
    /// Position accumulated up to `anchor`
    position: Duration,
    anchor: Instant,
    paused: bool,
    volume: f32,
}

impl SimulatedStream {
    fn position(&self, now: Instant, length: Duration) -> Duration {
        let position = if self.paused {
            self.position
        } else {
            self.position + now.saturating_duration_since(self.anchor)
        };
        position.min(length)
    }
}

/// Output adapter with a buffering delay and fixed-length streams
#[derive(Debug)]
pub struct SimulatedOutput {
    buffering: Duration,
    track_length: Duration,
    streams: HashMap<OutputHandle, SimulatedStream>,
    next_handle: u64,
}

impl SimulatedOutput {
    pub fn new(buffering: Duration, track_length: Duration) -> Self {
        Self {
            buffering,
            track_length,
            streams: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Volume last set on `handle`
    pub fn volume(&self, handle: OutputHandle) -> Option<f32> {
        self.streams.get(&handle).map(|s| s.volume)
    }

    /// Number of streams not yet stopped
    pub fn open_streams(&self) -> usize {
        self.streams.len()
    }
}

impl AudioOutput for SimulatedOutput {
    fn start_streaming(&mut self, stream: &StreamRef) -> Result<OutputHandle, OutputError> {
        if !stream.as_str().starts_with(STREAM_SCHEME) {
            return Err(OutputError::Refused(format!("unsupported stream {}", stream)));
        }

        self.next_handle += 1;
        let handle = OutputHandle::new(self.next_handle);
        let ready_at = Instant::now() + self.buffering;

        self.streams.insert(
            handle,
            SimulatedStream {
                ready_at,
                position: Duration::ZERO,
                anchor: ready_at,
                paused: false,
                volume: 1.0,
            },
        );
        debug!(handle = %handle, stream = %stream, "Simulated stream opened");
        Ok(handle)
    }

    fn pause(&mut self, handle: OutputHandle) {
        let now = Instant::now();
        let length = self.track_length;
        if let Some(stream) = self.streams.get_mut(&handle) {
            stream.position = stream.position(now, length);
            stream.paused = true;
        }
    }

    fn resume(&mut self, handle: OutputHandle) {
        let now = Instant::now();
        if let Some(stream) = self.streams.get_mut(&handle) {
            stream.anchor = now.max(stream.ready_at);
            stream.paused = false;
        }
    }

    fn set_volume(&mut self, handle: OutputHandle, volume: f32) {
        if let Some(stream) = self.streams.get_mut(&handle) {
            stream.volume = volume.clamp(0.0, 1.0);
        }
    }

    fn elapsed_seconds(&self, handle: OutputHandle) -> f64 {
        self.streams
            .get(&handle)
            .map(|s| s.position(Instant::now(), self.track_length).as_secs_f64())
            .unwrap_or(0.0)
    }

    fn is_playing(&self, handle: OutputHandle) -> bool {
        let now = Instant::now();
        self.streams.get(&handle).is_some_and(|s| {
            !s.paused && now >= s.ready_at && s.position(now, self.track_length) < self.track_length
        })
    }

    fn has_finished(&self, handle: OutputHandle) -> bool {
        self.streams
            .get(&handle)
            .is_some_and(|s| s.position(Instant::now(), self.track_length) >= self.track_length)
    }

    fn stop(&mut self, handle: OutputHandle) {
        if self.streams.remove(&handle).is_some() {
            debug!(handle = %handle, "Simulated stream closed");
        }
    }
}
