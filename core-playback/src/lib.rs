//! # Playback Backends Module
//!
//! Provides the two interchangeable playback backends behind one event and
//! state model.
//!
//! ## Overview
//!
//! This module handles:
//! - The [`AudioBackend`] contract and the [`BackendState`] snapshot
//! - The native backend, driving a host streaming media element and polling
//!   its download progress
//! - The plugin backend, driving an embedded plugin engine that calls back by
//!   instance id
//! - The [`PluginRegistry`] routing those inbound calls
//!
//! Both backends publish the normalized
//! [`PlayerEvent`](core_runtime::events::PlayerEvent)s on their own
//! [`EventBus`](core_runtime::events::EventBus).

pub mod error;
pub mod native;
pub mod plugin;
pub mod registry;
pub mod state;
pub mod traits;

pub use error::{PlaybackError, Result};
pub use native::NativeAudioBackend;
pub use plugin::PluginAudioBackend;
pub use registry::{InstanceId, PluginCallback, PluginRegistry};
pub use state::{validate_volume, BackendState};
pub use traits::{AudioBackend, BackendKind};
