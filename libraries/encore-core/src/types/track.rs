/// Track domain type
use super::{Release, ReleaseId, TrackId};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use std::time::Duration;

/// A single playable audio item
///
/// Tracks are immutable snapshots. The parent release is reachable through a
/// weak back-reference used only for artist/title context; a track never keeps
/// its release alive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier (also the key for stream resolution)
    pub id: TrackId,

    /// Display title
    pub title: String,

    /// Duration in milliseconds
    pub duration_ms: u64,

    /// Track number as printed on the release (display only, never used for ordering)
    pub track_number: Option<u32>,

    #[serde(skip)]
    release: Weak<Release>,
}

impl Track {
    /// Create a standalone track with no parent release
    pub fn new(id: impl Into<TrackId>, title: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration_ms,
            track_number: None,
            release: Weak::new(),
        }
    }

    pub(crate) fn from_draft(draft: TrackDraft, release: &Weak<Release>) -> Self {
        Self {
            id: draft.id,
            title: draft.title,
            duration_ms: draft.duration_ms,
            track_number: draft.track_number,
            release: release.clone(),
        }
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Parent release, if it is still alive
    pub fn release(&self) -> Option<Arc<Release>> {
        self.release.upgrade()
    }

    /// Parent release id, if it is still alive
    pub fn release_id(&self) -> Option<ReleaseId> {
        self.release().map(|r| r.id.clone())
    }

    /// Artist name taken from the parent release
    pub fn artist_name(&self) -> Option<String> {
        self.release().map(|r| r.artist.name.clone())
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.duration_ms == other.duration_ms
            && self.track_number == other.track_number
    }
}

impl Eq for Track {}

/// Track data used to build a `Release`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDraft {
    /// Track identifier
    pub id: TrackId,
    /// Display title
    pub title: String,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Advisory track number
    pub track_number: Option<u32>,
}

impl TrackDraft {
    /// Create a draft without a track number
    pub fn new(id: impl Into<TrackId>, title: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration_ms,
            track_number: None,
        }
    }

    /// Set the advisory track number
    pub fn number(mut self, track_number: u32) -> Self {
        self.track_number = Some(track_number);
        self
    }
}
