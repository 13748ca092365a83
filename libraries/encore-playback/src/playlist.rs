//! Playlist cursor
//!
//! Ordered list of track snapshots plus the index of the current track.
//!
//! ```text
//! tracks:  [ A ][ B ][ C ]
//! current:       ^
//! ```
//!
//! The cursor is replaced wholesale on every load; there are no incremental
//! edits. An empty playlist has no current index.

use encore_core::Track;

use crate::error::{PlaybackError, Result};

/// Playlist with a bounds-checked cursor
#[derive(Debug, Clone, Default)]
pub struct PlaylistCursor {
    tracks: Vec<Track>,
    /// `None` iff `tracks` is empty
    current: Option<usize>,
}

impl PlaylistCursor {
    /// Create an empty, inactive cursor
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the playlist; the first track becomes current
    pub fn load(&mut self, tracks: Vec<Track>) {
        self.current = if tracks.is_empty() { None } else { Some(0) };
        self.tracks = tracks;
    }

    /// Move to the next track
    ///
    /// Leaves the cursor untouched at the last track.
    pub fn advance(&mut self) -> Result<&Track> {
        let index = self.current.ok_or(PlaybackError::EmptyPlaylist)?;
        if index + 1 >= self.tracks.len() {
            return Err(PlaybackError::EndOfPlaylist);
        }
        self.current = Some(index + 1);
        Ok(&self.tracks[index + 1])
    }

    /// Move to the previous track
    ///
    /// Leaves the cursor untouched at the first track.
    pub fn retreat(&mut self) -> Result<&Track> {
        let index = self.current.ok_or(PlaybackError::EmptyPlaylist)?;
        if index == 0 {
            return Err(PlaybackError::StartOfPlaylist);
        }
        self.current = Some(index - 1);
        Ok(&self.tracks[index - 1])
    }

    /// Whether `advance` would succeed
    pub fn can_advance(&self) -> bool {
        self.current.is_some_and(|i| i + 1 < self.tracks.len())
    }

    /// Whether `retreat` would succeed
    pub fn can_retreat(&self) -> bool {
        self.current.is_some_and(|i| i > 0)
    }

    /// Track at the cursor
    pub fn current(&self) -> Result<&Track> {
        self.current
            .map(|i| &self.tracks[i])
            .ok_or(PlaybackError::EmptyPlaylist)
    }

    /// Index of the current track (`None` when empty)
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// All tracks in play order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Owned copy of the playlist for readers outside the engine
    pub fn snapshot(&self) -> Vec<Track> {
        self.tracks.clone()
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the playlist is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(ids: &[&str]) -> Vec<Track> {
        ids.iter()
            .map(|id| Track::new(*id, format!("Track {}", id), 1000))
            .collect()
    }

    #[test]
    fn load_selects_first_track() {
        let mut cursor = PlaylistCursor::new();
        cursor.load(tracks(&["a", "b"]));

        assert_eq!(cursor.current_index(), Some(0));
        assert_eq!(cursor.current().unwrap().id.as_str(), "a");
        assert!(cursor.can_advance());
        assert!(!cursor.can_retreat());
    }

    #[test]
    fn load_empty_is_inactive() {
        let mut cursor = PlaylistCursor::new();
        cursor.load(tracks(&["a"]));
        cursor.load(Vec::new());

        assert_eq!(cursor.current_index(), None);
        assert!(!cursor.can_advance());
        assert!(!cursor.can_retreat());
        assert!(matches!(cursor.current(), Err(PlaybackError::EmptyPlaylist)));
    }

    #[test]
    fn advance_stops_at_last_track() {
        let mut cursor = PlaylistCursor::new();
        cursor.load(tracks(&["a", "b", "c"]));

        assert_eq!(cursor.advance().unwrap().id.as_str(), "b");
        assert_eq!(cursor.advance().unwrap().id.as_str(), "c");
        assert!(matches!(cursor.advance(), Err(PlaybackError::EndOfPlaylist)));
        assert_eq!(cursor.current_index(), Some(2));
    }

    #[test]
    fn retreat_stops_at_first_track() {
        let mut cursor = PlaylistCursor::new();
        cursor.load(tracks(&["a", "b"]));
        cursor.advance().unwrap();

        assert_eq!(cursor.retreat().unwrap().id.as_str(), "a");
        assert!(matches!(cursor.retreat(), Err(PlaybackError::StartOfPlaylist)));
        assert_eq!(cursor.current_index(), Some(0));
    }

    #[test]
    fn moving_an_empty_cursor_reports_empty() {
        let mut cursor = PlaylistCursor::new();
        assert!(matches!(cursor.advance(), Err(PlaybackError::EmptyPlaylist)));
        assert!(matches!(cursor.retreat(), Err(PlaybackError::EmptyPlaylist)));
    }

    #[test]
    fn reload_resets_position() {
        let mut cursor = PlaylistCursor::new();
        cursor.load(tracks(&["a", "b", "c"]));
        cursor.advance().unwrap();
        cursor.advance().unwrap();

        cursor.load(tracks(&["x", "y"]));
        assert_eq!(cursor.current_index(), Some(0));
        assert_eq!(cursor.len(), 2);
        assert_eq!(cursor.snapshot()[1].id.as_str(), "y");
    }
}
