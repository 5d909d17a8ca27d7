//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `LINKDECK_*` environment variables (nested keys use `__`). Command line
//! flags are applied on top by the binary.
//!
//! ```toml
//! refresh_ms = 500
//! request_interval_ms = 1500
//! layout = "mini"
//! columns = 4
//!
//! [[latency_table]]
//! lower = 0.0
//! upper = 10.0
//! state = 1
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use crate::data::RangeTable;
use crate::deck::TopologyLayout;

/// Upper bound on link columns the dashboard will register.
pub const MAX_COLUMNS: u16 = 16;

const ENV_PREFIX: &str = "LINKDECK";

/// Errors from loading or validating [`Settings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Dashboard settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How often the source is polled, in milliseconds.
    pub refresh_ms: u64,
    /// Resend `request_health_data` at this interval while fetching.
    pub request_interval_ms: Option<u64>,
    pub layout: TopologyLayout,
    /// Number of link columns to register.
    pub columns: u16,
    pub latency_table: RangeTable,
    pub pps_table: RangeTable,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_ms: 1000,
            request_interval_ms: None,
            layout: TopologyLayout::default(),
            columns: 4,
            latency_table: RangeTable::default_latency(),
            pps_table: RangeTable::default_pps(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (if given) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with_env(path, None)
    }

    /// Like [`Settings::load`], reading variables from `env` instead of the
    /// process environment when it is `Some`.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .source(env),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.columns == 0 || self.columns > MAX_COLUMNS {
            return Err(SettingsError::Invalid(format!(
                "columns must be between 1 and {}, got {}",
                MAX_COLUMNS, self.columns
            )));
        }
        if self.refresh_ms == 0 {
            return Err(SettingsError::Invalid("refresh_ms must be positive".into()));
        }
        if self.request_interval_ms == Some(0) {
            return Err(SettingsError::Invalid(
                "request_interval_ms must be positive".into(),
            ));
        }
        if self.latency_table.is_empty() {
            return Err(SettingsError::Invalid("latency_table is empty".into()));
        }
        if self.pps_table.is_empty() {
            return Err(SettingsError::Invalid("pps_table is empty".into()));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    pub fn request_interval(&self) -> Option<Duration> {
        self.request_interval_ms.map(Duration::from_millis)
    }
}
