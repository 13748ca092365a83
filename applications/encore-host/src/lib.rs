//! Encore host
//!
//! Runs the playback engine against simulated collaborators: configuration
//! loading, the simulated catalog/output pair and a scripted session loop.

pub mod config;
pub mod error;
pub mod session;
pub mod simulated;
