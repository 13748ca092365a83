//! Playback engine - core orchestration
//!
//! Owns the playlist, the player state and the single active fade, and drives
//! the streaming sequence for the current track:
//!
//! ```text
//! play_* / next / previous
//!   └─▶ Ready ──resolve (async)──▶ start_streaming ──adapter outputting──▶ Playing
//!                     │                   │                                 (fade-in 0 → live)
//!                     └────── failure ────┴──────────▶ Failed
//! ```
//!
//! Everything happens on the caller's thread. Stream resolution runs on the
//! injected runtime and its result is applied by the next [`PlaybackEngine::tick`].

use std::sync::Arc;
use std::time::Duration;

use encore_core::{AudioOutput, CatalogService, OutputHandle, Release, StreamRef, Track};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::{
    error::{PlaybackError, Result},
    events::{
        ActionChange, ActionKind, EventHub, PlaylistActionKind, StateChange, SubscriptionId,
    },
    fade::{FadeDirection, FadeOperation, FadeScheduler, FadeStep},
    playlist::PlaylistCursor,
    resolver::{Resolution, StreamResolver},
    state::PlayerStateMachine,
    types::{FinishedPolicy, PlaybackConfig, PlaybackSnapshot, PlayerState},
    volume::Volume,
};

/// Client-side playback engine
///
/// Constructed with its collaborators; call [`tick`](Self::tick) from the
/// host's scheduling loop to advance fades, apply stream resolutions and poll
/// the output adapter.
pub struct PlaybackEngine {
    config: PlaybackConfig,
    machine: PlayerStateMachine,
    cursor: PlaylistCursor,
    current_release: Option<Arc<Release>>,
    volume: Volume,
    fades: FadeScheduler,
    resolver: StreamResolver,
    output: Box<dyn AudioOutput>,

    // Output adapter handle for the current track
    handle: Option<OutputHandle>,
    // Stream handed to the adapter, waiting for it to report output
    awaiting_start: bool,
    // Adapter paused after a completed fade-out
    output_halted: bool,
    // Last volume sent to the adapter
    applied_volume: f32,

    // Engine clock, advanced by tick
    clock: Duration,
    last_error: Option<String>,
    player_width: f32,

    state_events: EventHub<StateChange>,
    action_events: EventHub<ActionChange>,
}

impl std::fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("state", &self.machine.state())
            .field("current_index", &self.cursor.current_index())
            .field("handle", &self.handle)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl PlaybackEngine {
    /// Create a new engine
    ///
    /// Stream lookups are spawned on `runtime`; every other operation runs on
    /// the caller's thread.
    pub fn new(
        config: PlaybackConfig,
        catalog: Arc<dyn CatalogService>,
        output: Box<dyn AudioOutput>,
        runtime: Handle,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            volume: Volume::new(config.volume),
            machine: PlayerStateMachine::new(),
            cursor: PlaylistCursor::new(),
            current_release: None,
            fades: FadeScheduler::new(),
            resolver: StreamResolver::new(catalog, runtime),
            output,
            handle: None,
            awaiting_start: false,
            output_halted: false,
            applied_volume: 0.0,
            clock: Duration::ZERO,
            last_error: None,
            player_width: 0.0,
            state_events: EventHub::new(),
            action_events: EventHub::new(),
            config,
        })
    }

    // ===== Notifications =====

    /// Listen to every state transition
    pub fn subscribe_state<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.state_events.subscribe(listener)
    }

    /// Stop listening to state transitions
    pub fn unsubscribe_state(&mut self, id: SubscriptionId) -> bool {
        self.state_events.unsubscribe(id)
    }

    /// Listen to playlist/transport actions
    pub fn subscribe_actions<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&ActionChange) + Send + 'static,
    {
        self.action_events.subscribe(listener)
    }

    /// Stop listening to actions
    pub fn unsubscribe_actions(&mut self, id: SubscriptionId) -> bool {
        self.action_events.unsubscribe(id)
    }

    // ===== Playback Control =====

    /// Play a release from its first track
    ///
    /// If `release` is already current this only requests play (resume or
    /// retry); the playlist and position are kept. Otherwise the playlist is
    /// replaced with the release's tracks in canonical order.
    pub fn play_release(&mut self, release: Arc<Release>) -> Result<()> {
        if self
            .current_release
            .as_ref()
            .is_some_and(|current| current.id == release.id)
        {
            debug!(release_id = %release.id, "Release already current");
            return self.request_play();
        }

        let tracks: Vec<Track> = release.tracks().cloned().collect();
        info!(
            release_id = %release.id,
            title = %release.title,
            tracks = release.track_count(),
            duration_ms = release.duration_ms(),
            "Playing release"
        );

        self.current_release = Some(release);
        self.cursor.load(tracks);
        self.emit_action(ActionKind::PlaylistChanged, PlaylistActionKind::NewList);

        if self.cursor.is_empty() {
            self.unload();
            return Ok(());
        }

        self.emit_action(ActionKind::PlayRelease, PlaylistActionKind::None);
        self.start_pipeline()
    }

    /// Play a single track
    ///
    /// If `track` is already the current track this only requests play.
    /// Otherwise the playlist becomes `[track]` with no current release.
    pub fn play_track(&mut self, track: Track) -> Result<()> {
        if self.cursor.current().is_ok_and(|current| *current == track) {
            debug!(track_id = %track.id, "Track already current");
            return self.request_play();
        }

        info!(track_id = %track.id, title = %track.title, "Playing track");

        self.current_release = None;
        self.cursor.load(vec![track]);
        self.emit_action(ActionKind::PlaylistChanged, PlaylistActionKind::NewList);
        self.emit_action(ActionKind::Play, PlaylistActionKind::None);
        self.start_pipeline()
    }

    /// Request play of the current track
    ///
    /// - `Paused`: resume
    /// - `Playing`, or `Ready` while loading: nothing to do
    /// - `Failed`, stopped, or never started: (re)load the current track
    pub fn play(&mut self) -> Result<()> {
        self.request_play()
    }

    /// Pause playback
    ///
    /// Only acts while `Playing`. State becomes `Paused` right away; the
    /// output is halted once the fade-out completes.
    pub fn pause(&mut self) {
        if self.state() != PlayerState::Playing {
            return;
        }

        self.set_state(PlayerState::Paused);
        self.emit_action(ActionKind::Pause, PlaylistActionKind::None);

        let fade = FadeOperation::fade_out(self.clock, self.config.fade_out(), self.applied_volume);
        self.fades.start(fade);
        debug!(from = self.applied_volume, "Fading out");
    }

    /// Resume after [`pause`](Self::pause)
    ///
    /// Only acts while `Paused`. Fades in from the volume currently applied to
    /// the output, superseding a fade-out still in flight.
    pub fn resume(&mut self) {
        if self.state() != PlayerState::Paused {
            return;
        }
        let Some(handle) = self.handle else {
            return;
        };

        if self.output_halted {
            self.output.resume(handle);
            self.output_halted = false;
        }

        self.set_state(PlayerState::Playing);
        self.emit_action(ActionKind::Play, PlaylistActionKind::None);

        let fade = self
            .volume
            .fade_in(self.clock, self.config.fade_in(), self.applied_volume);
        self.fades.start(fade);
        debug!(from = self.applied_volume, "Fading in");
    }

    /// Stop at position 0 of the current track
    ///
    /// Tears down the output and any pending load. State becomes `Ready`, or
    /// `None` when the playlist is empty.
    pub fn stop(&mut self) {
        self.resolver.cancel();
        self.fades.cancel();
        self.teardown_output();

        if self.cursor.is_empty() {
            self.set_state(PlayerState::None);
        } else {
            self.set_state(PlayerState::Ready);
        }
    }

    /// Skip to the next track
    ///
    /// Fails with `EndOfPlaylist` on the last track, changing nothing.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        let track_id = self.cursor.advance()?.id.clone();
        debug!(track_id = %track_id, "Moved to next track");

        self.emit_action(ActionKind::IndexChanged, PlaylistActionKind::IndexChanged);
        self.start_pipeline()
    }

    /// Go back to the previous track
    ///
    /// Fails with `StartOfPlaylist` on the first track, changing nothing.
    pub fn previous(&mut self) -> Result<()> {
        let track_id = self.cursor.retreat()?.id.clone();
        debug!(track_id = %track_id, "Moved to previous track");

        self.emit_action(ActionKind::IndexChanged, PlaylistActionKind::IndexChanged);
        self.start_pipeline()
    }

    // ===== Volume Control =====

    /// Set volume (0-100)
    pub fn set_volume(&mut self, level: u8) {
        if self.volume.set_level(level) {
            self.refresh_volume();
        }
    }

    /// Volume level (0-100)
    pub fn volume(&self) -> u8 {
        self.volume.level()
    }

    /// Mute
    pub fn mute(&mut self) {
        if self.volume.mute() {
            self.refresh_volume();
        }
    }

    /// Unmute
    pub fn unmute(&mut self) {
        if self.volume.unmute() {
            self.refresh_volume();
        }
    }

    /// Toggle mute
    pub fn toggle_mute(&mut self) {
        if self.volume.toggle_mute() {
            self.refresh_volume();
        }
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Volume last sent to the output adapter
    pub fn output_volume(&self) -> f32 {
        self.applied_volume
    }

    // ===== Tick =====

    /// Advance the engine by `delta`
    ///
    /// Applies finished stream resolutions, polls the output adapter (errors,
    /// start confirmation, end of track) and advances the active fade.
    pub fn tick(&mut self, delta: Duration) {
        self.clock += delta;

        while let Some(resolution) = self.resolver.try_next() {
            self.apply_resolution(resolution);
        }

        self.poll_output();
        self.advance_fade();
    }

    // ===== State Queries =====

    /// Current player state
    pub fn state(&self) -> PlayerState {
        self.machine.state()
    }

    /// Copy of the playlist
    pub fn playlist(&self) -> Vec<Track> {
        self.cursor.snapshot()
    }

    /// Index of the current track (`None` when the playlist is empty)
    pub fn current_index(&self) -> Option<usize> {
        self.cursor.current_index()
    }

    /// Release the playlist was built from
    pub fn current_release(&self) -> Option<&Arc<Release>> {
        self.current_release.as_ref()
    }

    /// Track at the current index
    pub fn current_track(&self) -> Option<&Track> {
        self.cursor.current().ok()
    }

    /// Whether `next` would move
    pub fn can_move_forward(&self) -> bool {
        self.cursor.can_advance()
    }

    /// Whether `previous` would move
    pub fn can_move_back(&self) -> bool {
        self.cursor.can_retreat()
    }

    /// Position in the current track, as reported by the output adapter
    pub fn elapsed(&self) -> Duration {
        self.handle
            .map(|handle| self.output.elapsed_seconds(handle))
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(Duration::ZERO)
    }

    /// Length of the current track
    pub fn duration(&self) -> Option<Duration> {
        self.current_track().map(Track::duration)
    }

    /// Playback progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        match self.duration() {
            Some(total) if !total.is_zero() => {
                (self.elapsed().as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    /// Message of the most recent failure
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Fade currently in flight
    pub fn active_fade(&self) -> Option<&FadeOperation> {
        self.fades.active()
    }

    /// Engine clock (sum of every tick delta)
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Player width layout hint (not used by playback)
    pub fn player_width(&self) -> f32 {
        self.player_width
    }

    /// Store the player width layout hint
    pub fn set_player_width(&mut self, width: f32) {
        self.player_width = width;
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state(),
            playlist: self.playlist(),
            current_index: self.current_index(),
            current_release: self.current_release.as_ref().map(|r| r.id.clone()),
            can_move_forward: self.can_move_forward(),
            can_move_back: self.can_move_back(),
            elapsed: self.elapsed(),
            volume: self.volume(),
            muted: self.is_muted(),
            last_error: self.last_error.clone(),
            player_width: self.player_width,
        }
    }

    // ===== Internal =====

    fn request_play(&mut self) -> Result<()> {
        match self.state() {
            PlayerState::Paused => {
                self.resume();
                Ok(())
            }
            PlayerState::Playing => Ok(()),
            PlayerState::Ready if self.handle.is_some() || self.resolver.is_pending() => Ok(()),
            PlayerState::None | PlayerState::Ready | PlayerState::Failed => {
                if self.cursor.is_empty() {
                    return Err(PlaybackError::EmptyPlaylist);
                }
                self.emit_action(ActionKind::Play, PlaylistActionKind::None);
                self.start_pipeline()
            }
        }
    }

    /// Load the current track from scratch
    fn start_pipeline(&mut self) -> Result<()> {
        let track_id = self.cursor.current()?.id.clone();

        self.fades.cancel();
        self.teardown_output();
        self.last_error = None;
        self.set_state(PlayerState::Ready);

        let generation = self.resolver.request(track_id.clone());
        info!(track_id = %track_id, generation, "Loading track");
        Ok(())
    }

    fn apply_resolution(&mut self, resolution: Resolution) {
        let still_current = self.resolver.is_current(&resolution)
            && self
                .cursor
                .current()
                .is_ok_and(|track| track.id == resolution.track_id);

        if !still_current {
            let generation = resolution.generation;
            let stale = PlaybackError::StaleResolutionDiscarded(resolution.track_id);
            debug!(
                generation,
                current_generation = self.resolver.generation(),
                "{}",
                stale
            );
            return;
        }

        self.resolver.complete();

        match resolution.result {
            Ok(stream) => self.start_output(&stream),
            Err(err) => self.fail(PlaybackError::StreamResolutionFailed {
                track_id: resolution.track_id,
                message: err.to_string(),
            }),
        }
    }

    fn start_output(&mut self, stream: &StreamRef) {
        match self.output.start_streaming(stream) {
            Ok(handle) => {
                debug!(handle = %handle, stream = %stream, "Output accepted stream");
                self.output.set_volume(handle, 0.0);
                self.applied_volume = 0.0;
                self.handle = Some(handle);
                self.awaiting_start = true;
                self.output_halted = false;
            }
            Err(err) => self.fail(PlaybackError::AdapterStartFailed(err)),
        }
    }

    fn poll_output(&mut self) {
        let Some(handle) = self.handle else {
            return;
        };

        if let Some(err) = self.output.take_error(handle) {
            self.fail(PlaybackError::Output(err));
            return;
        }

        if self.awaiting_start {
            if self.output.is_playing(handle) {
                self.awaiting_start = false;
                self.set_state(PlayerState::Playing);

                let fade = self.volume.fade_in(self.clock, self.config.fade_in(), 0.0);
                self.fades.start(fade);

                if let Some(track) = self.current_track() {
                    info!(track_id = %track.id, "Playback started");
                }
            } else if self.output.has_finished(handle) {
                // Stream ran out between two ticks, before it was ever seen outputting
                self.awaiting_start = false;
                self.on_track_finished();
            }
            return;
        }

        if self.state() == PlayerState::Playing && self.output.has_finished(handle) {
            self.on_track_finished();
        }
    }

    fn on_track_finished(&mut self) {
        if let Some(track) = self.current_track() {
            info!(track_id = %track.id, "Track finished");
        }

        match self.config.finished_policy {
            FinishedPolicy::AutoAdvance if self.cursor.can_advance() => {
                if let Err(e) = self.next() {
                    warn!(error = %e, "Auto-advance failed");
                }
            }
            FinishedPolicy::AutoAdvance | FinishedPolicy::Stop => self.stop(),
        }
    }

    fn advance_fade(&mut self) {
        match self.fades.tick(self.clock, self.volume.target()) {
            FadeStep::Idle => {}
            FadeStep::Ramping { volume } => self.apply_volume(volume),
            FadeStep::Completed { volume, direction } => {
                self.apply_volume(volume);

                if direction == FadeDirection::Out && self.state() == PlayerState::Paused {
                    if let Some(handle) = self.handle {
                        self.output.pause(handle);
                        self.output_halted = true;
                        debug!(handle = %handle, "Output halted");
                    }
                }
            }
        }
    }

    /// Push a live volume change straight to the output when no fade owns it
    fn refresh_volume(&mut self) {
        if self.state() == PlayerState::Playing && !self.fades.is_active() {
            self.apply_volume(self.volume.target());
        }
    }

    fn apply_volume(&mut self, volume: f32) {
        if let Some(handle) = self.handle {
            self.output.set_volume(handle, volume);
        }
        self.applied_volume = volume;
    }

    /// Stop the adapter for the current handle, if any
    fn teardown_output(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.output.stop(handle);
        }
        self.awaiting_start = false;
        self.output_halted = false;
        self.applied_volume = 0.0;
    }

    /// Playlist emptied: nothing left to play
    fn unload(&mut self) {
        self.resolver.cancel();
        self.fades.cancel();
        self.teardown_output();
        self.set_state(PlayerState::None);
    }

    fn fail(&mut self, error: PlaybackError) {
        let message = error.to_string();
        warn!(error = %message, "Playback failed");

        self.resolver.cancel();
        self.fades.cancel();
        self.teardown_output();
        self.last_error = Some(message.clone());
        self.transition(PlayerState::Failed, Some(message));
    }

    fn set_state(&mut self, to: PlayerState) {
        self.transition(to, None);
    }

    fn transition(&mut self, to: PlayerState, error: Option<String>) {
        match self.machine.transition(to) {
            Ok(true) => {
                debug!(state = ?to, "State changed");
                self.state_events.emit(&StateChange { state: to, error });
            }
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Rejected state change"),
        }
    }

    fn emit_action(&mut self, action: ActionKind, playlist: PlaylistActionKind) {
        self.action_events.emit(&ActionChange::new(action, playlist));
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.resolver.cancel();
        if let Some(handle) = self.handle.take() {
            self.output.stop(handle);
        }
    }
}
