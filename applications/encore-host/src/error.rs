/// Host error types
use encore_playback::PlaybackError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),
}

pub type Result<T> = std::result::Result<T, HostError>;
