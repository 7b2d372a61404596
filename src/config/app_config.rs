use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use super::helpers::deserialize_duration_from_ms;

/// Provides the default refresh interval (matches the dashboard's cadence).
fn default_refresh_interval() -> Duration {
    Duration::from_millis(15_000)
}

/// Provides the default for refresh_enabled.
fn default_refresh_enabled() -> bool {
    true
}

/// Application configuration for alertfeed.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The interval in milliseconds between periodic refreshes.
    #[serde(
        deserialize_with = "deserialize_duration_from_ms",
        default = "default_refresh_interval"
    )]
    pub refresh_interval_ms: Duration,

    /// Whether the periodic refresh task is scheduled at all. When false,
    /// data only changes through manual triggers.
    #[serde(default = "default_refresh_enabled")]
    pub refresh_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval(),
            refresh_enabled: default_refresh_enabled(),
        }
    }
}

impl AppConfig {
    /// Creates a new `AppConfig` by reading from the configuration directory,
    /// layered under an `ALERTFEED`-prefixed environment overlay.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir_str = config_dir.unwrap_or("configs");
        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/alertfeed.yaml", config_dir_str)))
            .add_source(Environment::with_prefix("ALERTFEED").separator("__"))
            .build()?;
        s.try_deserialize()
    }

    /// Creates a new `AppConfigBuilder` for testing purposes.
    #[cfg(test)]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

/// A builder for `AppConfig` used in tests.
#[cfg(test)]
#[derive(Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    /// Sets the refresh interval.
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.config.refresh_interval_ms = interval;
        self
    }

    /// Sets whether periodic refresh is enabled.
    pub fn refresh_enabled(mut self, enabled: bool) -> Self {
        self.config.refresh_enabled = enabled;
        self
    }

    /// Builds the `AppConfig`.
    pub fn build(self) -> AppConfig {
        self.config
    }
}
