//! # Plugin Backend
//!
//! Drives an embedded plugin engine. Outbound commands go through the
//! [`PluginHandle`] returned by the host's [`PluginEmbedder`]; inbound
//! notifications arrive by instance id through the
//! [`PluginRegistry`](crate::registry::PluginRegistry) and are applied with
//! [`PluginAudioBackend::handle_callback`].
//!
//! The plugin reports progress itself, so unlike the native backend there is
//! no polling. Seeking does not start playback.

use crate::error::{PlaybackError, Result};
use crate::registry::{PluginCallback, PluginRegistry};
use crate::state::{validate_volume, BackendState, StateCell};
use crate::traits::{AudioBackend, BackendKind};
use bridge_traits::capability::Capabilities;
use bridge_traits::plugin::{EmbedRequest, PluginEmbedder, PluginHandle};
use bridge_traits::time::Clock;
use core_runtime::config::PlayerSettings;
use core_runtime::events::{EventBus, Observable, PlayerEvent};
use core_runtime::logging::strip_url;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, error, trace, warn};
use uuid::Uuid;

/// Backend for hosts that need the plugin engine.
pub struct PluginAudioBackend {
    weak_self: Weak<Self>,
    embedder: Rc<dyn PluginEmbedder>,
    registry: Rc<PluginRegistry>,
    clock: Rc<dyn Clock>,
    settings: PlayerSettings,
    instance_id: RefCell<Option<String>>,
    handle: RefCell<Option<Rc<dyn PluginHandle>>>,
    state: StateCell,
    events: EventBus,
}

impl PluginAudioBackend {
    /// Creates the backend.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::PluginUnavailable`] when `capabilities` say the
    /// plugin is required but not installed.
    pub fn new(
        capabilities: Capabilities,
        embedder: Rc<dyn PluginEmbedder>,
        registry: Rc<PluginRegistry>,
        clock: Rc<dyn Clock>,
        settings: PlayerSettings,
    ) -> Result<Rc<Self>> {
        if capabilities.plugin_missing() {
            error!("Plugin engine required but not installed");
            return Err(PlaybackError::PluginUnavailable);
        }

        Ok(Rc::new_cyclic(|weak_self| Self {
            weak_self: weak_self.clone(),
            embedder,
            registry,
            clock,
            settings,
            instance_id: RefCell::new(None),
            handle: RefCell::new(None),
            state: StateCell::default(),
            events: EventBus::new(),
        }))
    }

    /// Id assigned by the registry during `init`.
    pub fn instance_id(&self) -> Option<String> {
        self.instance_id.borrow().clone()
    }

    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    /// Zero the per-track state.
    pub fn reset(&self) {
        self.state.update(BackendState::reset);
    }

    fn handle(&self) -> Result<Rc<dyn PluginHandle>> {
        self.handle
            .borrow()
            .clone()
            .ok_or(PlaybackError::NotInitialized)
    }

    fn cache_buster(&self) -> String {
        format!(
            "{}{}",
            self.clock.unix_timestamp_millis(),
            Uuid::new_v4().simple()
        )
    }

    // ------------------------------------------------------------------
    // Inbound plugin notifications
    // ------------------------------------------------------------------

    /// Apply a notification raised by the plugin engine.
    pub fn handle_callback(&self, callback: PluginCallback) {
        match callback {
            PluginCallback::Ready => self.on_ready(),
            PluginCallback::TimeUpdate {
                position,
                duration,
                seekable,
            } => self.on_time_update(position, duration, seekable),
            PluginCallback::Progress { percent } => self.on_progress(percent),
            PluginCallback::LoadError => self.on_load_error(),
            PluginCallback::Play => self.on_play(),
            PluginCallback::Pause => self.on_pause(),
            PluginCallback::Ended => self.on_ended(),
        }
    }

    pub fn on_ready(&self) {
        debug!(instance = ?self.instance_id(), "Plugin engine ready");
        self.trigger(PlayerEvent::Ready);
    }

    pub fn on_time_update(&self, position: f64, duration: f64, seekable: bool) {
        let (position, duration) = self.state.update(|state| {
            state.record_time(position, duration);
            state.seekable = seekable;
            (state.position, state.duration)
        });
        trace!(position, duration, seekable, "Plugin time update");
        self.trigger(PlayerEvent::TimeUpdate { position, duration });
    }

    pub fn on_progress(&self, percent: u8) {
        let percent = self.state.update(|state| state.advance_progress(percent));
        trace!(percent, "Plugin download progress");
        self.trigger(PlayerEvent::Progress { percent });
    }

    pub fn on_load_error(&self) {
        warn!(instance = ?self.instance_id(), "Plugin engine failed to load source");
        self.state.update(|state| state.playing = false);
        self.trigger(PlayerEvent::Error {
            message: "Failed to load audio source".to_string(),
        });
    }

    pub fn on_play(&self) {
        self.state.update(|state| state.playing = true);
        self.trigger(PlayerEvent::Play);
    }

    pub fn on_pause(&self) {
        self.state.update(|state| state.playing = false);
        self.trigger(PlayerEvent::Pause);
    }

    pub fn on_ended(&self) {
        self.state.update(|state| state.playing = false);
        self.trigger(PlayerEvent::Ended);
    }
}

impl Observable for PluginAudioBackend {
    fn events(&self) -> &EventBus {
        &self.events
    }
}

impl AudioBackend for PluginAudioBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Plugin
    }

    /// Registers the instance and embeds the plugin. `ready` arrives later,
    /// from the plugin itself.
    fn init(&self) -> Result<()> {
        if self.is_initialized() {
            return Ok(());
        }

        let this = self
            .weak_self
            .upgrade()
            .ok_or_else(|| PlaybackError::Internal("plugin backend dropped".to_string()))?;
        let instance_id = match self.instance_id() {
            Some(id) => id,
            None => {
                let id = self.registry.register(&this);
                *self.instance_id.borrow_mut() = Some(id.clone());
                id
            }
        };

        let request = EmbedRequest::new(&self.settings.swf_path, &instance_id, self.cache_buster());
        debug!(instance = %instance_id, source = %request.source_url(), "Embedding plugin engine");
        let handle = self.embedder.embed(&request)?;
        *self.handle.borrow_mut() = Some(handle);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.handle.borrow().is_some()
    }

    fn load(&self, url: &str) -> Result<()> {
        let handle = self.handle()?;
        self.reset();
        debug!(source = strip_url(url), "Plugin load");
        handle.load(url)?;
        Ok(())
    }

    fn play(&self) -> Result<()> {
        self.handle()?.play()?;
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        self.handle()?.pause()?;
        Ok(())
    }

    /// Moves the playhead without starting playback.
    fn seek(&self, position: Duration) -> Result<()> {
        let handle = self.handle()?;
        self.state
            .update(|state| state.position = position.as_secs_f64());
        handle.seek_to(position)?;
        Ok(())
    }

    fn set_volume(&self, volume: f32) -> Result<()> {
        let volume = validate_volume(volume)?;
        self.handle()?.set_volume(volume)?;
        self.state.update(|state| state.volume = volume);
        Ok(())
    }

    fn state(&self) -> BackendState {
        self.state.get()
    }
}

impl fmt::Debug for PluginAudioBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginAudioBackend")
            .field("instance_id", &self.instance_id.borrow())
            .field("initialized", &self.is_initialized())
            .field("state", &self.state.get())
            .field("events", &self.events)
            .finish()
    }
}
