//! Encore Core
//!
//! Platform-agnostic data model, collaborator traits, and error types shared by
//! the Encore playback engine and its hosts.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Release`, `Media`, `Artist` and their ids
//! - **Collaborator Traits**: `CatalogService` (stream resolution) and
//!   `AudioOutput` (the output adapter the engine drives)
//! - **Error Handling**: `CatalogError` and `OutputError`
//!
//! # Example
//!
//! ```rust
//! use encore_core::types::{Artist, MediaDraft, Release, TrackDraft};
//!
//! let release = Release::new(
//!     "release-1",
//!     Artist::new("artist-1", "The Band"),
//!     "Live at Home",
//!     vec![
//!         MediaDraft::new(1, vec![TrackDraft::new("a", "Opener", 180_000)]),
//!         MediaDraft::new(2, vec![TrackDraft::new("b", "Encore", 240_000)]),
//!     ],
//! );
//!
//! let order: Vec<_> = release.tracks().map(|t| t.id.as_str().to_string()).collect();
//! assert_eq!(order, vec!["a", "b"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CatalogError, OutputError};
pub use traits::{AudioOutput, CatalogService};

pub use types::{
    Artist, ArtistId, Media, MediaDraft, OutputHandle, Release, ReleaseId, StreamRef, Track,
    TrackDraft, TrackId,
};
