//! End-to-end sessions against the simulated collaborators
//!
//! Runs on a paused Tokio clock so every timer fires deterministically.

use std::time::Duration;

use encore_host::config::{HostConfig, HostSettings};
use encore_host::session::{demo_release, run_session, SessionPlan};

fn fast_config(failing: &[&str]) -> HostConfig {
    HostConfig {
        playback: Default::default(),
        host: HostSettings {
            tick_hz: 100,
            catalog_latency_ms: 20,
            buffering_ms: 10,
            track_length_ms: 200,
            failing_tracks: failing.iter().map(|s| s.to_string()).collect(),
        },
    }
}

fn plan(tracks: usize) -> SessionPlan {
    SessionPlan {
        tracks,
        limit: Duration::from_secs(30),
        ..SessionPlan::default()
    }
}

#[test]
fn demo_release_spreads_tracks_over_two_media() {
    let release = demo_release(3, Duration::from_secs(4));

    assert_eq!(release.media.len(), 2);
    assert_eq!(release.media[0].tracks.len(), 2);
    assert_eq!(release.media[1].tracks.len(), 1);

    let ids: Vec<_> = release.tracks().map(|t| t.id.as_str().to_string()).collect();
    assert_eq!(ids, vec!["track-1", "track-2", "track-3"]);
}

#[tokio::test(start_paused = true)]
async fn plays_every_track_then_stops() {
    let config = fast_config(&[]);

    let report = run_session(&config, &plan(3), std::future::pending())
        .await
        .unwrap();

    assert_eq!(report.played, vec!["track-1", "track-2", "track-3"]);
    assert!(report.failures.is_empty());
    assert!(!report.interrupted);
}

#[tokio::test(start_paused = true)]
async fn failed_track_is_reported_and_skipped() {
    let config = fast_config(&["track-2"]);

    let report = run_session(&config, &plan(3), std::future::pending())
        .await
        .unwrap();

    assert_eq!(report.played, vec!["track-1", "track-3"]);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].contains("track-2"));
}

#[tokio::test(start_paused = true)]
async fn scripted_pause_resumes_the_same_track() {
    let config = fast_config(&[]);
    let plan = SessionPlan {
        pause_at: Some(Duration::from_millis(50)),
        pause_for: Duration::from_millis(100),
        ..plan(1)
    };

    let report = run_session(&config, &plan, std::future::pending())
        .await
        .unwrap();

    assert_eq!(report.played, vec!["track-1"]);
    assert!(!report.interrupted);
}

#[tokio::test(start_paused = true)]
async fn shutdown_interrupts_the_session() {
    let config = fast_config(&[]);

    let report = run_session(&config, &plan(3), async {}).await.unwrap();

    assert!(report.interrupted);
    assert!(report.played.is_empty());
}
