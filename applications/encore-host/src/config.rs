/// Host configuration
use crate::error::{HostError, Result};
use encore_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "encore.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct HostConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub host: HostSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HostSettings {
    /// Engine ticks per second
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,

    /// Simulated catalog round-trip
    #[serde(default = "default_catalog_latency_ms")]
    pub catalog_latency_ms: u64,

    /// Simulated output start-up delay before audio flows
    #[serde(default = "default_buffering_ms")]
    pub buffering_ms: u64,

    /// Length of every simulated stream
    #[serde(default = "default_track_length_ms")]
    pub track_length_ms: u64,

    /// Track ids the simulated catalog refuses to resolve
    #[serde(default)]
    pub failing_tracks: Vec<String>,
}

impl HostSettings {
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(1) / self.tick_hz.max(1)
    }

    pub fn catalog_latency(&self) -> Duration {
        Duration::from_millis(self.catalog_latency_ms)
    }

    pub fn buffering(&self) -> Duration {
        Duration::from_millis(self.buffering_ms)
    }

    pub fn track_length(&self) -> Duration {
        Duration::from_millis(self.track_length_ms)
    }
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            tick_hz: default_tick_hz(),
            catalog_latency_ms: default_catalog_latency_ms(),
            buffering_ms: default_buffering_ms(),
            track_length_ms: default_track_length_ms(),
            failing_tracks: Vec::new(),
        }
    }
}

impl HostConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `encore.toml` is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, Self::environment())
    }

    /// Environment source: `ENCORE_` prefix, `__` between nesting levels
    /// (e.g. `ENCORE_HOST__TICK_HZ=30`, `ENCORE_PLAYBACK__VOLUME=60`)
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix("ENCORE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("host.failing_tracks")
    }

    pub fn load_with(path: Option<&Path>, environment: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(environment);

        let config: HostConfig = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.playback.validate()?;

        if self.host.tick_hz == 0 || self.host.tick_hz > 1000 {
            return Err(HostError::Invalid(format!(
                "tick_hz must be within 1-1000, got {}",
                self.host.tick_hz
            )));
        }

        if self.host.track_length_ms == 0 {
            return Err(HostError::Invalid(
                "track_length_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_tick_hz() -> u32 {
    60
}

fn default_catalog_latency_ms() -> u64 {
    150
}

fn default_buffering_ms() -> u64 {
    100
}

fn default_track_length_ms() -> u64 {
    4_000
}
