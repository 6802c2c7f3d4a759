//! # Host Bridge Traits
//!
//! Contracts between the hybrid audio core and the host that embeds it.
//!
//! ## Overview
//!
//! The core never constructs media elements, embeds plugins or probes codec
//! support on its own. Each of those is a capability the host supplies through
//! one of the traits below; the core only consumes the interface.
//!
//! ## Traits
//!
//! ### Engines
//! - [`NativeMediaElement`](playback::NativeMediaElement) - Streaming media element driven by the native adapter
//! - [`MediaElementFactory`](playback::MediaElementFactory) - Creates native media elements
//! - [`PluginEmbedder`](plugin::PluginEmbedder) - Mounts a plugin engine instance
//! - [`PluginHandle`](plugin::PluginHandle) - Outbound commands to a mounted plugin engine
//!
//! ### Environment
//! - [`CapabilityDetector`](capability::CapabilityDetector) - Which engine can be used
//! - [`IntervalScheduler`](timer::IntervalScheduler) - Repeating timers for progress polling
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Threading
//!
//! The player runs on a single cooperative event thread. Engine traits are
//! therefore not `Send`; shared handles are `Rc`, and implementations may
//! invoke registered callbacks synchronously from inside a command.
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Host
//! implementations should convert platform-specific failures into it with an
//! actionable message.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::plugin::{EmbedRequest, PluginEmbedder, PluginHandle};
//! use bridge_traits::error::Result;
//! use std::rc::Rc;
//!
//! struct PageEmbedder;
//!
//! impl PluginEmbedder for PageEmbedder {
//!     fn embed(&self, request: &EmbedRequest) -> Result<Rc<dyn PluginHandle>> {
//!         // Insert the plugin markup pointing at `request.source_url()`
//!         todo!()
//!     }
//! }
//! ```

pub mod capability;
pub mod error;
pub mod playback;
pub mod plugin;
pub mod time;
pub mod timer;

pub use error::BridgeError;

// Re-export commonly used types
pub use capability::{Capabilities, CapabilityDetector, StaticCapabilities};
pub use playback::{
    MediaElementFactory, MediaEvent, MediaEventCallback, NativeMediaElement, Preload, TimeRanges,
};
pub use plugin::{EmbedRequest, PluginEmbedder, PluginHandle};
pub use time::{Clock, ConsoleLogger, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
pub use timer::{IntervalCallback, IntervalScheduler, ManualIntervalScheduler, TimerId};
