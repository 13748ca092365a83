//! Encore - Playback Engine
//!
//! Client-side playback for streamed releases.
//!
//! This crate provides:
//! - Playlist cursor (wholesale replace, bounds-checked next/previous)
//! - Player state machine (`None`, `Ready`, `Playing`, `Paused`, `Failed`)
//! - Volume control (logarithmic, 0-100%, mute/unmute)
//! - Linear fade-in on start/resume and fade-out on pause
//! - Asynchronous stream resolution with stale-result detection
//! - State and action notifications for the presentation layer
//!
//! # Architecture
//!
//! `encore-playback` does not decode or output audio and does not talk HTTP.
//! Both are collaborators injected at construction:
//! - [`CatalogService`](encore_core::CatalogService) resolves a track into a
//!   stream reference
//! - [`AudioOutput`](encore_core::AudioOutput) plays that stream and reports
//!   elapsed time, "outputting" and "finished"
//!
//! The host calls [`PlaybackEngine::tick`] from its scheduling loop. Fades,
//! output polling and resolution results are all applied there.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use async_trait::async_trait;
//! use encore_core::{
//!     AudioOutput, CatalogError, CatalogService, OutputError, OutputHandle, StreamRef, TrackId,
//! };
//! use encore_core::types::{Artist, MediaDraft, Release, TrackDraft};
//! use encore_playback::{PlaybackConfig, PlaybackEngine};
//!
//! struct Cdn;
//!
//! #[async_trait]
//! impl CatalogService for Cdn {
//!     async fn resolve_stream(&self, track_id: &TrackId) -> Result<StreamRef, CatalogError> {
//!         Ok(StreamRef::new(format!("https://cdn.example/{}", track_id)))
//!     }
//! }
//!
//! struct Speaker;
//!
//! impl AudioOutput for Speaker {
//!     fn start_streaming(&mut self, _: &StreamRef) -> Result<OutputHandle, OutputError> {
//!         Ok(OutputHandle::new(1))
//!     }
//!     fn pause(&mut self, _: OutputHandle) {}
//!     fn resume(&mut self, _: OutputHandle) {}
//!     fn set_volume(&mut self, _: OutputHandle, _: f32) {}
//!     fn elapsed_seconds(&self, _: OutputHandle) -> f64 { 0.0 }
//!     fn is_playing(&self, _: OutputHandle) -> bool { true }
//!     fn has_finished(&self, _: OutputHandle) -> bool { false }
//!     fn stop(&mut self, _: OutputHandle) {}
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> encore_playback::Result<()> {
//! let mut engine = PlaybackEngine::new(
//!     PlaybackConfig::default(),
//!     Arc::new(Cdn),
//!     Box::new(Speaker),
//!     tokio::runtime::Handle::current(),
//! )?;
//!
//! engine.subscribe_state(|change| println!("state: {:?}", change.state));
//!
//! let release = Release::new(
//!     "release-1",
//!     Artist::new("artist-1", "The Band"),
//!     "Live at Home",
//!     vec![MediaDraft::new(1, vec![TrackDraft::new("a", "Opener", 180_000)])],
//! );
//! engine.play_release(release)?;
//!
//! loop {
//!     tokio::time::sleep(Duration::from_millis(16)).await;
//!     engine.tick(Duration::from_millis(16));
//! }
//! # }
//! ```

mod engine;
mod error;
pub mod events;
pub mod fade;
mod playlist;
mod resolver;
mod state;
pub mod types;
mod volume;

// Public exports
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::{ActionChange, ActionKind, PlaylistActionKind, StateChange, SubscriptionId};
pub use fade::{FadeDirection, FadeOperation, FadeScheduler, FadeStep};
pub use playlist::PlaylistCursor;
pub use state::PlayerStateMachine;
pub use types::{FinishedPolicy, PlaybackConfig, PlaybackSnapshot, PlayerState};
pub use volume::Volume;
