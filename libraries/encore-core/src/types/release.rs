//! Release and media types

use super::{ArtistId, ReleaseId, Track, TrackDraft};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};

/// An artist credited on a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    /// Artist identifier
    pub id: ArtistId,
    /// Display name
    pub name: String,
}

impl Artist {
    /// Create an artist reference
    pub fn new(id: impl Into<ArtistId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One disc (or side, or digital medium) of a release
#[derive(Debug, Clone, Serialize)]
pub struct Media {
    /// Position of the medium within the release (display only)
    pub position: u32,
    /// Tracks in play order
    pub tracks: Vec<Track>,
}

/// Media data used to build a `Release`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDraft {
    /// Position of the medium within the release
    pub position: u32,
    /// Track drafts in play order
    pub tracks: Vec<TrackDraft>,
}

impl MediaDraft {
    /// Create a medium draft
    pub fn new(position: u32, tracks: Vec<TrackDraft>) -> Self {
        Self { position, tracks }
    }
}

/// A collection of media, normally the unit picked from search results
///
/// Flattening all media in order yields the canonical play order.
#[derive(Debug, Serialize)]
pub struct Release {
    /// Release identifier
    pub id: ReleaseId,
    /// Credited artist
    pub artist: Artist,
    /// Release title
    pub title: String,
    /// Media in order
    pub media: Vec<Media>,
}

impl Release {
    /// Build a release; every track receives a back-reference to it
    pub fn new(
        id: impl Into<ReleaseId>,
        artist: Artist,
        title: impl Into<String>,
        media: Vec<MediaDraft>,
    ) -> Arc<Self> {
        let id = id.into();
        let title = title.into();

        Arc::new_cyclic(|weak: &Weak<Release>| Release {
            id,
            artist,
            title,
            media: media
                .into_iter()
                .map(|draft| Media {
                    position: draft.position,
                    tracks: draft
                        .tracks
                        .into_iter()
                        .map(|t| Track::from_draft(t, weak))
                        .collect(),
                })
                .collect(),
        })
    }

    /// All tracks in canonical order (media order, then track order)
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.media.iter().flat_map(|m| m.tracks.iter())
    }

    /// Number of tracks across all media
    pub fn track_count(&self) -> usize {
        self.media.iter().map(|m| m.tracks.len()).sum()
    }

    /// Total running time in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.tracks().map(|t| t.duration_ms).sum()
    }
}
