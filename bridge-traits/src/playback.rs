//! Native media element bridge traits and supporting types.
//!
//! These abstractions let the native playback adapter drive a host-provided
//! streaming media element (an HTML audio element in a browser, a platform
//! media player elsewhere) without knowing how it is constructed. The element
//! reports lifecycle changes through [`MediaEvent`] notifications; the adapter
//! reads the buffered and seekable ranges to derive progress.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Lifecycle notifications a native media element can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaEvent {
    Play,
    Pause,
    Ended,
    TimeUpdate,
    /// Enough data is available to begin playback.
    CanPlay,
    /// The current source failed to load.
    Error,
}

impl MediaEvent {
    /// Name used by DOM-style hosts for this notification.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaEvent::Play => "play",
            MediaEvent::Pause => "pause",
            MediaEvent::Ended => "ended",
            MediaEvent::TimeUpdate => "timeupdate",
            MediaEvent::CanPlay => "canplay",
            MediaEvent::Error => "error",
        }
    }
}

impl fmt::Display for MediaEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preload hint applied to a freshly created element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preload {
    None,
    Metadata,
    #[default]
    Auto,
}

impl Preload {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preload::None => "none",
            Preload::Metadata => "metadata",
            Preload::Auto => "auto",
        }
    }
}

impl FromStr for Preload {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "none" => Ok(Preload::None),
            "metadata" => Ok(Preload::Metadata),
            "auto" | "" => Ok(Preload::Auto),
            other => Err(format!("unknown preload mode: {other}")),
        }
    }
}

/// Ordered list of `[start, end)` ranges in seconds, as reported by the
/// element's `buffered` and `seekable` attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeRanges {
    ranges: Vec<(f64, f64)>,
}

impl TimeRanges {
    pub fn new(ranges: Vec<(f64, f64)>) -> Self {
        Self { ranges }
    }

    /// Empty range list.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Single range starting at zero.
    pub fn from_start(end: f64) -> Self {
        Self::new(vec![(0.0, end)])
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn start(&self, index: usize) -> Option<f64> {
        self.ranges.get(index).map(|(start, _)| *start)
    }

    pub fn end(&self, index: usize) -> Option<f64> {
        self.ranges.get(index).map(|(_, end)| *end)
    }

    /// End of the last range, used as the downloaded high-water mark.
    pub fn last_end(&self) -> Option<f64> {
        self.ranges.last().map(|(_, end)| *end)
    }
}

/// Callback registered for a [`MediaEvent`].
pub type MediaEventCallback = Box<dyn Fn()>;

/// Host media element driven by the native playback adapter.
///
/// Implementations wrap a single element instance. Commands return as soon as
/// the request is handed to the engine; the outcome arrives later as a
/// [`MediaEvent`]. Implementations may raise events synchronously from inside
/// a command, so callers must not hold locks or borrows across these calls.
pub trait NativeMediaElement {
    /// Apply a preload hint.
    fn set_preload(&self, preload: Preload);

    /// Assign a new source URL without fetching it.
    fn set_src(&self, url: &str);

    /// (Re)fetch the current source.
    fn load(&self);

    /// Start or resume playback.
    fn play(&self) -> Result<()>;

    /// Pause playback.
    fn pause(&self);

    /// Playhead position in seconds.
    fn current_time(&self) -> f64;

    /// Move the playhead, in seconds.
    fn set_current_time(&self, seconds: f64);

    /// Media duration in seconds. `NaN` until metadata is known.
    fn duration(&self) -> f64;

    /// Set output volume in `0.0..=1.0`.
    fn set_volume(&self, volume: f32);

    /// Downloaded ranges.
    fn buffered(&self) -> TimeRanges;

    /// Ranges the engine can seek into.
    fn seekable(&self) -> TimeRanges;

    /// Register `callback` to run whenever `event` fires.
    fn add_event_listener(&self, event: MediaEvent, callback: MediaEventCallback);
}

/// Creates native media elements for the native adapter's `init`.
pub trait MediaElementFactory {
    fn create(&self) -> Result<Rc<dyn NativeMediaElement>>;
}
