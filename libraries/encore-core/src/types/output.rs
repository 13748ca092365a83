//! Opaque handles exchanged with the catalog and the output adapter

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolved, playable stream location (usually a URL)
///
/// Obtained from a `CatalogService`; the engine never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamRef(String);

impl StreamRef {
    /// Wrap a resolved stream location
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// Get the raw location
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle for one stream started on an `AudioOutput`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputHandle(u64);

impl OutputHandle {
    /// Wrap an adapter-issued handle value
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw handle value
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OutputHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
