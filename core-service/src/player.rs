//! # Player Facade
//!
//! Selects one backend from the host's capabilities, keeps the public
//! `playing` flag in sync with the backend's events and republishes every
//! event on the player's own bus.
//!
//! ## Backend Selection
//!
//! | Native supported | Plugin installed | Backend                  |
//! |------------------|------------------|--------------------------|
//! | yes              | any              | native                   |
//! | no               | yes              | plugin                   |
//! | no               | no               | `PluginUnavailable` error |
//!
//! There is no automatic fallback from one backend to the other.

use crate::dependencies::PlayerDependencies;
use crate::error::{CoreError, Result};
use crate::options::{PlayerOptions, ReadyCallback};
use bridge_traits::capability::Capabilities;
use core_playback::{
    AudioBackend, BackendKind, NativeAudioBackend, PlaybackError, PluginAudioBackend,
};
use core_runtime::config::PlayerSettings;
use core_runtime::events::{listener, EventBus, EventKind, Observable, PlayerEvent};
use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, error, info, trace, warn};

/// Public audio player.
///
/// Cloning is cheap and yields another handle to the same player.
#[derive(Clone)]
pub struct Player {
    inner: Rc<PlayerInner>,
}

struct PlayerInner {
    settings: PlayerSettings,
    backend: Rc<dyn AudioBackend>,
    on_ready: Option<ReadyCallback>,
    playing: Cell<bool>,
    ready: Cell<bool>,
    events: EventBus,
}

impl Player {
    /// Creates a player and initializes its backend.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Runtime`] when the settings overrides are invalid
    /// - [`CoreError::Playback`] with [`PlaybackError::PluginUnavailable`]
    ///   when neither engine can be used
    /// - [`CoreError::CapabilityMissing`] when a collaborator of the selected
    ///   backend was not provided
    /// - [`CoreError::InitializationFailed`] when the backend engine could
    ///   not be created or embedded
    pub fn new(options: PlayerOptions, deps: PlayerDependencies) -> Result<Self> {
        let settings = PlayerSettings::merged(&options.settings)?;
        let capabilities = deps.capabilities.detect();
        let backend = select_backend(capabilities, &deps, &settings)?;
        let kind = backend.kind();

        let player = Player {
            inner: Rc::new(PlayerInner {
                settings,
                backend,
                on_ready: options.ready,
                playing: Cell::new(false),
                ready: Cell::new(false),
                events: EventBus::new(),
            }),
        };

        // Subscribe before init: the native backend reports ready from inside it.
        player.wire_backend_events();

        if let Err(err) = player.inner.backend.init() {
            error!(backend = %kind, error = %err, "Failed to initialize playback backend");
            return Err(CoreError::InitializationFailed(format!(
                "{kind} backend: {err}"
            )));
        }

        info!(backend = %kind, "Player created");
        Ok(player)
    }

    fn wire_backend_events(&self) {
        for kind in EventKind::ALL {
            let weak: Weak<PlayerInner> = Rc::downgrade(&self.inner);
            self.inner.backend.on(
                kind,
                listener(move |event| {
                    if let Some(inner) = weak.upgrade() {
                        Player { inner }.handle_backend_event(event);
                    }
                }),
            );
        }
    }

    fn handle_backend_event(&self, event: &PlayerEvent) {
        match event {
            PlayerEvent::Ready => {
                if !self.inner.ready.replace(true) {
                    debug!(backend = %self.backend_kind(), "Player ready");
                    if let Some(callback) = &self.inner.on_ready {
                        callback(self);
                    }
                }
            }
            PlayerEvent::Play => self.inner.playing.set(true),
            PlayerEvent::Pause | PlayerEvent::Ended => self.inner.playing.set(false),
            PlayerEvent::TimeUpdate { position, duration } => {
                trace!(position, duration, "timeupdate");
            }
            PlayerEvent::Progress { percent } => trace!(percent, "progress"),
            PlayerEvent::Error { message } => {
                warn!(%message, "Playback error");
                self.inner.playing.set(false);
            }
        }
        self.inner.events.trigger(event.clone());
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn load(&self, url: &str) -> Result<()> {
        Ok(self.inner.backend.load(url)?)
    }

    pub fn play(&self) -> Result<()> {
        Ok(self.inner.backend.play()?)
    }

    pub fn pause(&self) -> Result<()> {
        Ok(self.inner.backend.pause()?)
    }

    /// Pause when playing, play otherwise.
    pub fn play_pause(&self) -> Result<()> {
        if self.is_playing() {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Move the playhead. The native backend also starts playback; the
    /// plugin backend does not.
    pub fn seek(&self, position: Duration) -> Result<()> {
        Ok(self.inner.backend.seek(position)?)
    }

    /// Last volume accepted by [`set_volume`](Self::set_volume).
    pub fn volume(&self) -> f32 {
        self.inner.backend.volume()
    }

    /// # Errors
    ///
    /// [`PlaybackError::InvalidVolume`] for values outside `[0.0, 1.0]`; the
    /// current volume is kept.
    pub fn set_volume(&self, volume: f32) -> Result<()> {
        Ok(self.inner.backend.set_volume(volume)?)
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    pub fn position(&self) -> f64 {
        self.inner.backend.position()
    }

    pub fn duration(&self) -> f64 {
        self.inner.backend.duration()
    }

    pub fn load_percent(&self) -> u8 {
        self.inner.backend.load_percent()
    }

    pub fn seekable(&self) -> bool {
        self.inner.backend.seekable()
    }

    pub fn is_playing(&self) -> bool {
        self.inner.playing.get()
    }

    /// Whether the backend has reported `ready`.
    pub fn is_ready(&self) -> bool {
        self.inner.ready.get()
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.inner.backend.kind()
    }

    pub fn settings(&self) -> &PlayerSettings {
        &self.inner.settings
    }
}

impl Observable for Player {
    fn events(&self) -> &EventBus {
        &self.inner.events
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("backend", &self.backend_kind())
            .field("ready", &self.is_ready())
            .field("playing", &self.is_playing())
            .field("settings", &self.inner.settings)
            .finish()
    }
}

fn select_backend(
    capabilities: Capabilities,
    deps: &PlayerDependencies,
    settings: &PlayerSettings,
) -> Result<Rc<dyn AudioBackend>> {
    if capabilities.plugin_missing() {
        error!("No usable audio engine: native playback unsupported and plugin not installed");
        return Err(PlaybackError::PluginUnavailable.into());
    }

    if !capabilities.requires_plugin() {
        let backend: Rc<dyn AudioBackend> = NativeAudioBackend::new(
            deps.require_media_factory()?,
            deps.require_scheduler()?,
            settings.clone(),
        );
        return Ok(backend);
    }

    let backend: Rc<dyn AudioBackend> = PluginAudioBackend::new(
        capabilities,
        deps.require_plugin_embedder()?,
        Rc::clone(&deps.registry),
        Rc::clone(&deps.clock),
        settings.clone(),
    )?;
    Ok(backend)
}
