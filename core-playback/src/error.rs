//! # Playback Error Types
//!
//! Errors returned synchronously by playback commands. Asynchronous failures
//! (a source that cannot be loaded) are never errors; they arrive as
//! [`PlayerEvent::Error`](core_runtime::events::PlayerEvent::Error).

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Capability Errors
    // ========================================================================
    /// The plugin engine is required but not installed.
    #[error("Plugin engine unavailable: native playback is unsupported and no plugin is installed")]
    PluginUnavailable,

    // ========================================================================
    // Playback Control Errors
    // ========================================================================
    /// Command issued before `init()`.
    #[error("Playback backend not initialized")]
    NotInitialized,

    /// Invalid volume value (must be in range [0.0, 1.0]).
    #[error("Invalid volume: {0} (must be between 0.0 and 1.0)")]
    InvalidVolume(f32),

    // ========================================================================
    // Plugin Bridge Errors
    // ========================================================================
    /// No plugin backend is registered under this instance id.
    #[error("Unknown plugin instance: {0}")]
    UnknownInstance(String),

    /// An inbound plugin call could not be decoded.
    #[error("Invalid plugin callback {name}: {reason}")]
    InvalidCallback { name: String, reason: String },

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// A host collaborator failed.
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// Internal error (should not occur in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaybackError {
    /// Returns `true` if this error means the host cannot play audio at all.
    pub fn is_capability_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::PluginUnavailable
                | PlaybackError::Bridge(BridgeError::NotAvailable(_))
        )
    }

    /// Returns `true` if this error originated in a host collaborator.
    pub fn is_bridge_error(&self) -> bool {
        matches!(self, PlaybackError::Bridge(_))
    }

    pub(crate) fn invalid_callback(name: &str, reason: impl Into<String>) -> Self {
        PlaybackError::InvalidCallback {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
