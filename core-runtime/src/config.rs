//! # Player Settings
//!
//! Immutable defaults combined with caller overrides into a fresh
//! [`PlayerSettings`] value per player instance.
//!
//! ## Overview
//!
//! Defaults are never mutated. Each player merges its own
//! [`SettingsOverrides`] onto [`PlayerSettings::default()`] through
//! [`PlayerSettings::merged`], which validates the result and fails fast with
//! an actionable [`Error::Config`] message.
//!
//! ## Defaults
//!
//! | Setting             | Default        |
//! |---------------------|----------------|
//! | `swf_path`          | `audiojs.swf`  |
//! | `progress_interval` | 250 ms         |
//! | `instance_prefix`   | `hybrid_audio` |
//! | `preload`           | `auto`         |
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::config::{PlayerSettings, SettingsOverrides};
//! use std::time::Duration;
//!
//! let overrides = SettingsOverrides::new()
//!     .with_swf_path("/static/player.swf")
//!     .with_progress_interval(Duration::from_millis(500));
//!
//! let settings = PlayerSettings::merged(&overrides).unwrap();
//! assert_eq!(settings.swf_path, "/static/player.swf");
//! assert_eq!(settings.instance_prefix, "hybrid_audio");
//! ```
//!
//! Overrides can also come from JSON. Unknown keys are ignored and missing
//! keys keep their defaults:
//!
//! ```rust
//! use core_runtime::config::{PlayerSettings, SettingsOverrides};
//!
//! let overrides = SettingsOverrides::from_json(
//!     r#"{ "swf_path": "player.swf", "throw_errors": true }"#,
//! ).unwrap();
//! let settings = PlayerSettings::merged(&overrides).unwrap();
//! assert_eq!(settings.swf_path, "player.swf");
//! ```

use crate::error::{Error, Result};
use bridge_traits::playback::Preload;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default location of the plugin engine binary.
pub const DEFAULT_SWF_PATH: &str = "audiojs.swf";

/// Default native progress poll interval.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

/// Default prefix of plugin instance ids.
pub const DEFAULT_INSTANCE_PREFIX: &str = "hybrid_audio";

/// Resolved settings of one player instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSettings {
    /// Location of the plugin engine binary, used by the plugin backend only.
    pub swf_path: String,

    /// Period of the native backend's download progress poll.
    pub progress_interval: Duration,

    /// Prefix of plugin instance ids (`<prefix><n>`).
    pub instance_prefix: String,

    /// Preload hint applied to native media elements.
    pub preload: Preload,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            swf_path: DEFAULT_SWF_PATH.to_string(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            instance_prefix: DEFAULT_INSTANCE_PREFIX.to_string(),
            preload: Preload::Auto,
        }
    }
}

impl PlayerSettings {
    /// Combines the defaults with `overrides` into a new validated value.
    pub fn merged(overrides: &SettingsOverrides) -> Result<Self> {
        Self::default().with_overrides(overrides)
    }

    /// Returns a copy of `self` with every field set in `overrides` replaced.
    pub fn with_overrides(&self, overrides: &SettingsOverrides) -> Result<Self> {
        let mut settings = self.clone();

        if let Some(ref path) = overrides.swf_path {
            settings.swf_path = path.clone();
        }
        if let Some(ms) = overrides.progress_interval_ms {
            settings.progress_interval = Duration::from_millis(ms);
        }
        if let Some(ref prefix) = overrides.instance_prefix {
            settings.instance_prefix = prefix.clone();
        }
        if let Some(preload) = overrides.preload {
            settings.preload = preload;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Validates the settings and returns an error if invalid.
    ///
    /// This checks:
    /// - Plugin path is not empty
    /// - Instance prefix is not empty
    /// - Progress interval is non-zero
    pub fn validate(&self) -> Result<()> {
        if self.swf_path.trim().is_empty() {
            return Err(Error::Config(
                "Plugin path cannot be empty. Set swf_path or omit it to use the default."
                    .to_string(),
            ));
        }

        if self.instance_prefix.trim().is_empty() {
            return Err(Error::Config(
                "Instance prefix cannot be empty".to_string(),
            ));
        }

        if self.progress_interval.is_zero() {
            return Err(Error::Config(
                "Progress interval must be greater than 0ms".to_string(),
            ));
        }

        Ok(())
    }
}

/// Caller-supplied settings. Every field is optional; `None` keeps the
/// default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsOverrides {
    pub swf_path: Option<String>,
    pub progress_interval_ms: Option<u64>,
    pub instance_prefix: Option<String>,
    pub preload: Option<Preload>,
}

impl SettingsOverrides {
    /// Overrides that change nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses overrides from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the plugin engine path
    pub fn with_swf_path(mut self, path: impl Into<String>) -> Self {
        self.swf_path = Some(path.into());
        self
    }

    /// Sets the native progress poll interval
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval_ms = Some(interval.as_millis() as u64);
        self
    }

    /// Sets the plugin instance id prefix
    pub fn with_instance_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.instance_prefix = Some(prefix.into());
        self
    }

    /// Sets the native preload hint
    pub fn with_preload(mut self, preload: Preload) -> Self {
        self.preload = Some(preload);
        self
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
