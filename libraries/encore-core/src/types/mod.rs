mod ids;
mod output;
mod release;
mod track;

pub use ids::{ArtistId, ReleaseId, TrackId};
pub use output::{OutputHandle, StreamRef};
pub use release::{Artist, Media, MediaDraft, Release};
pub use track::{Track, TrackDraft};
