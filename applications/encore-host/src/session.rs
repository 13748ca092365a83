//! Scripted playback session
//!
//! Wires the simulated collaborators into a [`PlaybackEngine`], plays a demo
//! release and drives `tick` from a Tokio interval until the release has
//! finished, the time limit is hit, or shutdown is requested.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use encore_core::types::{Artist, MediaDraft, Release, TrackDraft, TrackId};
use encore_playback::{PlaybackEngine, PlayerState};
use tokio::runtime::Handle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::HostConfig;
use crate::error::Result;
use crate::simulated::{SimulatedCatalog, SimulatedOutput};

/// What the session should do
#[derive(Debug, Clone)]
pub struct SessionPlan {
    /// Tracks in the demo release
    pub tracks: usize,
    /// Pause the first track once it has played this long
    pub pause_at: Option<Duration>,
    /// How long to stay paused
    pub pause_for: Duration,
    /// Give up after this much wall time
    pub limit: Duration,
}

impl Default for SessionPlan {
    fn default() -> Self {
        Self {
            tracks: 3,
            pause_at: None,
            pause_for: Duration::from_secs(1),
            limit: Duration::from_secs(600),
        }
    }
}

/// What happened during a session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionReport {
    /// Track ids that reached `Playing`, in order
    pub played: Vec<String>,
    /// Failure messages surfaced on the state channel
    pub failures: Vec<String>,
    /// Session ended by shutdown or time limit rather than by finishing
    pub interrupted: bool,
}

/// Demo release split over two media
pub fn demo_release(tracks: usize, track_length: Duration) -> Arc<Release> {
    let drafts: Vec<TrackDraft> = (1..=tracks)
        .map(|n| {
            TrackDraft::new(
                TrackId::new(format!("track-{}", n)),
                format!("Demo Track {}", n),
                track_length.as_millis() as u64,
            )
            .number(n as u32)
        })
        .collect();

    let split = drafts.len().div_ceil(2);
    let mut first = drafts;
    let second = first.split_off(split);

    let mut media = vec![MediaDraft::new(1, first)];
    if !second.is_empty() {
        media.push(MediaDraft::new(2, second));
    }

    Release::new(
        "demo-release",
        Artist::new("demo-artist", "The Simulators"),
        "Encore Demo",
        media,
    )
}

/// Run a session until the release finishes or `shutdown` resolves
pub async fn run_session<F>(
    config: &HostConfig,
    plan: &SessionPlan,
    shutdown: F,
) -> Result<SessionReport>
where
    F: Future<Output = ()>,
{
    let catalog = SimulatedCatalog::new(
        config.host.catalog_latency(),
        config.host.failing_tracks.iter().cloned(),
    );
    let output = SimulatedOutput::new(config.host.buffering(), config.host.track_length());

    let mut engine = PlaybackEngine::new(
        config.playback.clone(),
        Arc::new(catalog),
        Box::new(output),
        Handle::current(),
    )?;

    let failures = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&failures);
    engine.subscribe_state(move |change| {
        info!(state = ?change.state, "Player state changed");
        if let Some(error) = &change.error {
            if let Ok(mut failures) = sink.lock() {
                failures.push(error.clone());
            }
        }
    });
    engine.subscribe_actions(|change| {
        debug!(action = ?change.action, playlist = ?change.playlist, "Player action");
    });

    let release = demo_release(plan.tracks, config.host.track_length());
    let last_track = release.tracks().last().map(|t| t.id.as_str().to_string());
    engine.play_release(release)?;

    let mut interval = tokio::time::interval(config.host.tick_period());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let started = Instant::now();
    let mut last = started;
    let mut report = SessionReport::default();
    let mut paused_since: Option<Instant> = None;
    let mut pause_done = plan.pause_at.is_none();

    tokio::pin!(shutdown);

    loop {
        let now = tokio::select! {
            biased;

            () = &mut shutdown => {
                info!("Shutdown requested");
                report.interrupted = true;
                break;
            }
            now = interval.tick() => now,
        };

        engine.tick(now - last);
        last = now;

        let current = engine.current_track().map(|t| t.id.as_str().to_string());

        match engine.state() {
            PlayerState::Playing => {
                if report.played.last() != current.as_ref() {
                    if let Some(id) = current.clone() {
                        report.played.push(id);
                    }
                }

                if let (false, Some(pause_at)) = (pause_done, plan.pause_at) {
                    if engine.elapsed() >= pause_at {
                        info!(elapsed = ?engine.elapsed(), "Pausing");
                        engine.pause();
                        paused_since = Some(now);
                        pause_done = true;
                    }
                }
            }
            PlayerState::Paused => {
                if paused_since.is_some_and(|since| now - since >= plan.pause_for) {
                    info!("Resuming");
                    engine.resume();
                    paused_since = None;
                }
            }
            PlayerState::Failed => {
                if engine.can_move_forward() {
                    warn!(error = ?engine.last_error(), "Skipping failed track");
                    engine.next()?;
                } else {
                    break;
                }
            }
            PlayerState::Ready => {
                let finished_last = current.is_some()
                    && current == last_track
                    && report.played.last() == current.as_ref();
                if finished_last && !engine.can_move_forward() {
                    info!("Release finished");
                    break;
                }
            }
            PlayerState::None => break,
        }

        if now - started >= plan.limit {
            warn!(limit = ?plan.limit, "Session time limit reached");
            report.interrupted = true;
            break;
        }
    }

    engine.stop();
    report.failures = failures.lock().map(|f| f.clone()).unwrap_or_default();
    Ok(report)
}
