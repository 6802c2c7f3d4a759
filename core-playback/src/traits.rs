//! # Core Playback Traits
//!
//! The backend contract shared by the native and plugin adapters. The facade
//! in `core-service` holds exactly one `Rc<dyn AudioBackend>`, selected once
//! at construction and never swapped.
//!
//! ## Threading Model
//!
//! Backends are single-threaded (`!Send`). Commands return as soon as the
//! request is handed to the engine; completion is reported through the
//! backend's [`EventBus`](core_runtime::events::EventBus).
//!
//! ## Seek Semantics
//!
//! The two engines disagree on whether seeking starts playback, and both
//! behaviors are kept as documented differences:
//!
//! | Backend  | `seek` starts playback |
//! |----------|------------------------|
//! | Native   | yes                    |
//! | Plugin   | no                     |
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use core_playback::AudioBackend;
//! use core_runtime::events::{listener, EventKind, PlayerEvent};
//! use std::time::Duration;
//!
//! fn start(backend: &dyn AudioBackend) -> core_playback::Result<()> {
//!     backend.on(
//!         EventKind::Progress,
//!         listener(|event| {
//!             if let PlayerEvent::Progress { percent } = event {
//!                 println!("downloaded {percent}%");
//!             }
//!         }),
//!     );
//!     backend.init()?;
//!     backend.load("https://example.com/track.mp3")?;
//!     backend.set_volume(0.8)?;
//!     backend.seek(Duration::from_secs(30))?;
//!     Ok(())
//! }
//! ```

use crate::error::Result;
use crate::state::BackendState;
use core_runtime::events::Observable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which engine a backend drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Host streaming media element.
    Native,
    /// Embedded plugin engine.
    Plugin,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Native => "native",
            BackendKind::Plugin => "plugin",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common interface of the playback backends.
///
/// Every command other than [`init`](Self::init) fails with
/// [`PlaybackError::NotInitialized`](crate::PlaybackError::NotInitialized)
/// until `init` has succeeded.
pub trait AudioBackend: Observable {
    /// Engine driven by this backend.
    fn kind(&self) -> BackendKind;

    /// Create or embed the engine. Publishes `ready` once the backend accepts
    /// commands. Calling it again is a no-op.
    fn init(&self) -> Result<()>;

    /// Whether [`init`](Self::init) has succeeded.
    fn is_initialized(&self) -> bool;

    /// Start fetching `url`. Resets `load_percent` to 0.
    fn load(&self, url: &str) -> Result<()>;

    /// Start or resume playback.
    fn play(&self) -> Result<()>;

    /// Pause playback.
    fn pause(&self) -> Result<()>;

    /// Move the playhead. See the module docs for whether this also starts
    /// playback.
    fn seek(&self, position: Duration) -> Result<()>;

    /// Set output volume.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::InvalidVolume`](crate::PlaybackError::InvalidVolume)
    /// for non-finite values or values outside `[0.0, 1.0]`; the stored
    /// volume is left unchanged.
    fn set_volume(&self, volume: f32) -> Result<()>;

    /// Snapshot of the current state.
    fn state(&self) -> BackendState;

    /// Last volume accepted by [`set_volume`](Self::set_volume).
    fn volume(&self) -> f32 {
        self.state().volume
    }

    /// Playhead position (seconds).
    fn position(&self) -> f64 {
        self.state().position
    }

    /// Track duration (seconds), 0 while unknown.
    fn duration(&self) -> f64 {
        self.state().duration
    }

    /// Downloaded share of the track, `0..=100`.
    fn load_percent(&self) -> u8 {
        self.state().load_percent
    }

    fn seekable(&self) -> bool {
        self.state().seekable
    }

    fn is_playing(&self) -> bool {
        self.state().playing
    }
}
