//! Shared test doubles for the playback engine tests
//!
//! - `FakeCatalog`: resolves `stream://<id>`, with per-track gates (hold a
//!   lookup until released) and scripted failures
//! - `FakeOutput`: recording output adapter with a scriptable "buffering",
//!   "finished" and error channel

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use encore_core::types::{Artist, MediaDraft, Release, TrackDraft};
use encore_core::{
    AudioOutput, CatalogError, CatalogService, OutputError, OutputHandle, StreamRef, TrackId,
};
use encore_playback::{ActionChange, PlaybackConfig, PlaybackEngine, StateChange};
use tokio::sync::oneshot;

/// One host frame
pub const FRAME: Duration = Duration::from_millis(10);

// ============================================================================
// Catalog
// ============================================================================

#[derive(Default)]
pub struct FakeCatalog {
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    failures: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Hold the next lookup of `id` until the returned sender fires (or drops)
    pub fn hold(&self, id: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(id.to_string(), rx);
        tx
    }

    /// Make every lookup of `id` fail with a network error
    pub fn fail(&self, id: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(id.to_string(), message.to_string());
    }

    /// Let lookups of `id` succeed again
    pub fn heal(&self, id: &str) {
        self.failures.lock().unwrap().remove(id);
    }

    /// Every track id looked up, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogService for FakeCatalog {
    async fn resolve_stream(&self, track_id: &TrackId) -> Result<StreamRef, CatalogError> {
        let id = track_id.as_str().to_string();
        self.calls.lock().unwrap().push(id.clone());

        let gate = self.gates.lock().unwrap().remove(&id);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let failure = self.failures.lock().unwrap().get(&id).cloned();
        match failure {
            Some(message) => Err(CatalogError::Network(message)),
            None => Ok(StreamRef::new(format!("stream://{}", id))),
        }
    }
}

// ============================================================================
// Output adapter
// ============================================================================

#[derive(Debug, Default)]
pub struct OutputState {
    pub started: Vec<(OutputHandle, StreamRef)>,
    pub volumes: Vec<(OutputHandle, f32)>,
    pub pauses: Vec<OutputHandle>,
    pub resumes: Vec<OutputHandle>,
    pub stops: Vec<OutputHandle>,
    pub live: HashSet<OutputHandle>,
    pub halted: HashSet<OutputHandle>,
    pub finished: HashSet<OutputHandle>,
    pub buffering: bool,
    pub refuse: Option<String>,
    pub pending_error: Option<OutputError>,
    pub elapsed: f64,
    next_handle: u64,
}

/// Recording output adapter; clones share state with the engine's copy
#[derive(Clone, Default)]
pub struct FakeOutput {
    inner: Arc<Mutex<OutputState>>,
}

impl FakeOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, OutputState> {
        self.inner.lock().unwrap()
    }

    /// While buffering, started streams do not report outputting
    pub fn set_buffering(&self, buffering: bool) {
        self.state().buffering = buffering;
    }

    /// Refuse the next `start_streaming` call
    pub fn refuse_next(&self, message: &str) {
        self.state().refuse = Some(message.to_string());
    }

    /// Report the most recent stream as naturally finished
    pub fn finish_current(&self) {
        let mut state = self.state();
        if let Some((handle, _)) = state.started.last().cloned() {
            state.finished.insert(handle);
        }
    }

    /// Queue an asynchronous device failure
    pub fn raise_error(&self, message: &str) {
        self.state().pending_error = Some(OutputError::Device(message.to_string()));
    }

    pub fn set_elapsed(&self, seconds: f64) {
        self.state().elapsed = seconds;
    }

    /// Stream references handed to the adapter, in order
    pub fn started_streams(&self) -> Vec<String> {
        self.state()
            .started
            .iter()
            .map(|(_, stream)| stream.as_str().to_string())
            .collect()
    }

    pub fn last_volume(&self) -> Option<f32> {
        self.state().volumes.last().map(|(_, volume)| *volume)
    }

    pub fn current_handle(&self) -> Option<OutputHandle> {
        self.state().started.last().map(|(handle, _)| *handle)
    }
}

impl AudioOutput for FakeOutput {
    fn start_streaming(&mut self, stream: &StreamRef) -> Result<OutputHandle, OutputError> {
        let mut state = self.state();
        if let Some(message) = state.refuse.take() {
            return Err(OutputError::Refused(message));
        }

        state.next_handle += 1;
        let handle = OutputHandle::new(state.next_handle);
        state.started.push((handle, stream.clone()));
        state.live.insert(handle);
        state.elapsed = 0.0;
        Ok(handle)
    }

    fn pause(&mut self, handle: OutputHandle) {
        let mut state = self.state();
        state.pauses.push(handle);
        state.halted.insert(handle);
    }

    fn resume(&mut self, handle: OutputHandle) {
        let mut state = self.state();
        state.resumes.push(handle);
        state.halted.remove(&handle);
    }

    fn set_volume(&mut self, handle: OutputHandle, volume: f32) {
        self.state().volumes.push((handle, volume));
    }

    fn elapsed_seconds(&self, handle: OutputHandle) -> f64 {
        let state = self.state();
        if state.live.contains(&handle) {
            state.elapsed
        } else {
            0.0
        }
    }

    fn is_playing(&self, handle: OutputHandle) -> bool {
        let state = self.state();
        !state.buffering && state.live.contains(&handle) && !state.halted.contains(&handle)
    }

    fn has_finished(&self, handle: OutputHandle) -> bool {
        self.state().finished.contains(&handle)
    }

    fn stop(&mut self, handle: OutputHandle) {
        let mut state = self.state();
        state.stops.push(handle);
        state.live.remove(&handle);
    }

    fn take_error(&mut self, _handle: OutputHandle) -> Option<OutputError> {
        self.state().pending_error.take()
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Two media: [A, B] and [C]
pub fn release_abc() -> Arc<Release> {
    Release::new(
        "rel-abc",
        Artist::new("artist-1", "The Band"),
        "Two Sides",
        vec![
            MediaDraft::new(
                1,
                vec![
                    TrackDraft::new("A", "Alpha", 180_000).number(1),
                    TrackDraft::new("B", "Bravo", 200_000).number(2),
                ],
            ),
            MediaDraft::new(2, vec![TrackDraft::new("C", "Charlie", 240_000).number(1)]),
        ],
    )
}

/// Single-media release with the given track ids
pub fn release_of(id: &str, track_ids: &[&str]) -> Arc<Release> {
    let tracks = track_ids
        .iter()
        .map(|t| TrackDraft::new(*t, format!("Track {}", t), 120_000))
        .collect();
    Release::new(
        id,
        Artist::new("artist-2", "Someone Else"),
        format!("Release {}", id),
        vec![MediaDraft::new(1, tracks)],
    )
}

pub struct Harness {
    pub engine: PlaybackEngine,
    pub catalog: Arc<FakeCatalog>,
    pub output: FakeOutput,
    pub actions: Arc<Mutex<Vec<ActionChange>>>,
    pub states: Arc<Mutex<Vec<StateChange>>>,
}

impl Harness {
    /// Engine with default config; must be called inside a Tokio runtime
    pub fn new() -> Self {
        Self::with_config(PlaybackConfig::default())
    }

    pub fn with_config(config: PlaybackConfig) -> Self {
        let catalog = FakeCatalog::new();
        let output = FakeOutput::new();
        let mut engine = PlaybackEngine::new(
            config,
            catalog.clone(),
            Box::new(output.clone()),
            tokio::runtime::Handle::current(),
        )
        .unwrap();

        let actions = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&actions);
        engine.subscribe_actions(move |change| sink.lock().unwrap().push(*change));

        let states = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&states);
        engine.subscribe_state(move |change| sink.lock().unwrap().push(change.clone()));

        Self {
            engine,
            catalog,
            output,
            actions,
            states,
        }
    }

    /// Let spawned lookups run and deliver, without moving the engine clock
    pub async fn settle(&mut self) {
        for _ in 0..10 {
            tokio::task::yield_now().await;
            self.engine.tick(Duration::ZERO);
        }
    }

    /// Tick the engine forward by `total`, one frame at a time
    pub fn advance(&mut self, total: Duration) {
        let mut left = total;
        while !left.is_zero() {
            let step = left.min(FRAME);
            self.engine.tick(step);
            left -= step;
        }
    }

    pub fn take_actions(&self) -> Vec<ActionChange> {
        std::mem::take(&mut *self.actions.lock().unwrap())
    }

    pub fn take_states(&self) -> Vec<StateChange> {
        std::mem::take(&mut *self.states.lock().unwrap())
    }

    pub fn current_id(&self) -> Option<String> {
        self.engine
            .current_track()
            .map(|track| track.id.as_str().to_string())
    }
}
