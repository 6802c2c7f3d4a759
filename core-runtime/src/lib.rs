//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the hybrid audio player:
//! - Per-object event bus shared by every playback backend and the facade
//! - Player settings with immutable defaults
//! - Logging and tracing infrastructure
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the playback and service crates
//! depend on. It establishes the single-threaded event dispatch model, the
//! settings merge rules and the logging conventions used throughout the
//! system.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{PlayerSettings, SettingsOverrides};
pub use error::{Error, Result};
pub use events::{bind, listener, EventBus, EventKind, EventSeverity, Listener, Observable, PlayerEvent};
