//! Playback capability detection.
//!
//! Hosts decide once, at startup, whether the native engine can play the
//! target format and whether the plugin engine is installed. The core only
//! consumes the answer.

use serde::{Deserialize, Serialize};

/// Capability flags reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    /// The native engine cannot play the target format.
    pub native_unsupported: bool,
    /// The plugin engine is installed and can be embedded.
    pub plugin_present: bool,
}

impl Capabilities {
    /// Native playback works; plugin presence is irrelevant.
    pub fn native() -> Self {
        Self {
            native_unsupported: false,
            plugin_present: false,
        }
    }

    /// Native playback is unsupported and the plugin is available.
    pub fn plugin_only() -> Self {
        Self {
            native_unsupported: true,
            plugin_present: true,
        }
    }

    /// Neither engine is usable.
    pub fn none() -> Self {
        Self {
            native_unsupported: true,
            plugin_present: false,
        }
    }

    /// The plugin engine must be used.
    pub fn requires_plugin(&self) -> bool {
        self.native_unsupported
    }

    /// The plugin engine is required but missing.
    pub fn plugin_missing(&self) -> bool {
        self.native_unsupported && !self.plugin_present
    }
}

/// Source of [`Capabilities`].
pub trait CapabilityDetector {
    fn detect(&self) -> Capabilities;
}

/// Detector returning a fixed answer, computed once by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCapabilities(pub Capabilities);

impl CapabilityDetector for StaticCapabilities {
    fn detect(&self) -> Capabilities {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_missing_only_when_required() {
        assert!(!Capabilities::native().plugin_missing());
        assert!(!Capabilities::plugin_only().plugin_missing());
        assert!(Capabilities::none().plugin_missing());
        assert!(Capabilities::none().requires_plugin());
    }

    #[test]
    fn static_detector_returns_fixed_flags() {
        let detector = StaticCapabilities(Capabilities::plugin_only());
        assert_eq!(detector.detect(), Capabilities::plugin_only());
    }
}
