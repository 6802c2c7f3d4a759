//! # Native Backend
//!
//! Drives a host streaming media element through [`NativeMediaElement`].
//!
//! ## Load Cycle
//!
//! 1. `load(url)` cancels the progress poll, assigns the source and asks the
//!    element to fetch it.
//! 2. When the element raises `canplay` the backend reads `seekable`, starts
//!    the progress poll for seekable sources, then seeks to 0 and pauses.
//!    Some engines only report an accurate buffered range after the playhead
//!    has moved once.
//! 3. Each poll tick turns the last buffered range into a download
//!    percentage and publishes `progress`. The poll stops at 100 %.

use crate::error::{PlaybackError, Result};
use crate::state::{buffered_percent, validate_volume, BackendState, StateCell};
use crate::traits::{AudioBackend, BackendKind};
use bridge_traits::playback::{MediaElementFactory, MediaEvent, NativeMediaElement};
use bridge_traits::timer::{IntervalScheduler, TimerId};
use core_runtime::config::PlayerSettings;
use core_runtime::events::{EventBus, Observable, PlayerEvent};
use core_runtime::logging::strip_url;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, error, trace, warn};

/// Backend for hosts whose native media engine can play the target format.
pub struct NativeAudioBackend {
    weak_self: Weak<Self>,
    factory: Rc<dyn MediaElementFactory>,
    scheduler: Rc<dyn IntervalScheduler>,
    settings: PlayerSettings,
    element: RefCell<Option<Rc<dyn NativeMediaElement>>>,
    poll: Cell<Option<TimerId>>,
    state: StateCell,
    events: EventBus,
}

impl NativeAudioBackend {
    pub fn new(
        factory: Rc<dyn MediaElementFactory>,
        scheduler: Rc<dyn IntervalScheduler>,
        settings: PlayerSettings,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak_self| Self {
            weak_self: weak_self.clone(),
            factory,
            scheduler,
            settings,
            element: RefCell::new(None),
            poll: Cell::new(None),
            state: StateCell::default(),
            events: EventBus::new(),
        })
    }

    /// Whether the download progress poll is running.
    pub fn is_polling(&self) -> bool {
        self.poll
            .get()
            .is_some_and(|id| self.scheduler.is_active(id))
    }

    fn element(&self) -> Result<Rc<dyn NativeMediaElement>> {
        self.element
            .borrow()
            .clone()
            .ok_or(PlaybackError::NotInitialized)
    }

    fn listen(&self, element: &Rc<dyn NativeMediaElement>, event: MediaEvent, handler: fn(&Self)) {
        let weak = self.weak_self.clone();
        element.add_event_listener(
            event,
            Box::new(move || {
                if let Some(this) = weak.upgrade() {
                    handler(&this);
                }
            }),
        );
    }

    // ------------------------------------------------------------------
    // Engine notifications
    // ------------------------------------------------------------------

    fn on_play(&self) {
        self.state.update(|state| state.playing = true);
        self.trigger(PlayerEvent::Play);
    }

    fn on_pause(&self) {
        self.state.update(|state| state.playing = false);
        self.trigger(PlayerEvent::Pause);
    }

    fn on_ended(&self) {
        self.state.update(|state| state.playing = false);
        self.trigger(PlayerEvent::Ended);
    }

    fn on_time_update(&self) {
        let Ok(element) = self.element() else {
            return;
        };
        if element.buffered().is_empty() {
            return;
        }
        let (current, duration) = (element.current_time(), element.duration());
        let (position, duration) = self.state.update(|state| {
            state.record_time(current, duration);
            (state.position, state.duration)
        });
        trace!(position, duration, "Native time update");
        self.trigger(PlayerEvent::TimeUpdate { position, duration });
    }

    fn on_can_play(&self) {
        let Ok(element) = self.element() else {
            return;
        };
        let seekable = !element.seekable().is_empty();
        debug!(seekable, "Native source can play");

        if seekable {
            self.start_progress_poll();
        }

        // Seek-then-pause so the engine reports a reliable buffered range.
        if let Err(err) = self.seek(Duration::ZERO) {
            warn!(error = %err, "Failed to rewind freshly loaded source");
        }
        element.pause();

        self.state.update(|state| {
            state.reset();
            state.seekable = seekable;
        });
    }

    fn on_error(&self) {
        warn!("Native engine failed to load source");
        self.state.update(|state| state.playing = false);
        self.trigger(PlayerEvent::Error {
            message: "Failed to load audio source".to_string(),
        });
    }

    // ------------------------------------------------------------------
    // Progress poll
    // ------------------------------------------------------------------

    fn start_progress_poll(&self) {
        self.clear_progress_poll();

        let weak = self.weak_self.clone();
        let scheduled = self.scheduler.set_interval(
            self.settings.progress_interval,
            Box::new(move || {
                if let Some(this) = weak.upgrade() {
                    this.poll_progress();
                }
            }),
        );

        match scheduled {
            Ok(id) => self.poll.set(Some(id)),
            Err(err) => error!(error = %err, "Failed to schedule download progress poll"),
        }
    }

    fn clear_progress_poll(&self) {
        if let Some(id) = self.poll.take() {
            self.scheduler.clear_interval(id);
        }
    }

    fn poll_progress(&self) {
        let Ok(element) = self.element() else {
            return;
        };
        let Some(buffered_end) = element.buffered().last_end() else {
            return;
        };
        let duration = element.duration();
        let Some(reading) = buffered_percent(buffered_end, duration) else {
            return;
        };

        let percent = self.state.update(|state| {
            state.duration = duration;
            state.advance_progress(reading)
        });
        trace!(percent, "Native download progress");

        if percent >= 100 {
            self.clear_progress_poll();
        }
        self.trigger(PlayerEvent::Progress { percent });
    }
}

impl Observable for NativeAudioBackend {
    fn events(&self) -> &EventBus {
        &self.events
    }
}

impl AudioBackend for NativeAudioBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }

    fn init(&self) -> Result<()> {
        if self.is_initialized() {
            return Ok(());
        }

        let element = self.factory.create()?;
        element.set_preload(self.settings.preload);
        self.listen(&element, MediaEvent::Play, Self::on_play);
        self.listen(&element, MediaEvent::Pause, Self::on_pause);
        self.listen(&element, MediaEvent::Ended, Self::on_ended);
        self.listen(&element, MediaEvent::TimeUpdate, Self::on_time_update);
        self.listen(&element, MediaEvent::CanPlay, Self::on_can_play);
        self.listen(&element, MediaEvent::Error, Self::on_error);
        *self.element.borrow_mut() = Some(element);

        debug!(preload = self.settings.preload.as_str(), "Native backend initialized");
        self.trigger(PlayerEvent::Ready);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.element.borrow().is_some()
    }

    fn load(&self, url: &str) -> Result<()> {
        let element = self.element()?;
        self.clear_progress_poll();
        debug!(source = strip_url(url), "Native load");
        element.set_src(url);
        element.load();
        self.state.update(|state| state.load_percent = 0);
        Ok(())
    }

    fn play(&self) -> Result<()> {
        self.element()?.play()?;
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        self.element()?.pause();
        Ok(())
    }

    /// Moves the playhead and starts playback.
    fn seek(&self, position: Duration) -> Result<()> {
        let element = self.element()?;
        let seconds = position.as_secs_f64();
        self.state.update(|state| state.position = seconds);
        element.set_current_time(seconds);
        element.play()?;
        Ok(())
    }

    fn set_volume(&self, volume: f32) -> Result<()> {
        let volume = validate_volume(volume)?;
        self.element()?.set_volume(volume);
        self.state.update(|state| state.volume = volume);
        Ok(())
    }

    fn state(&self) -> BackendState {
        self.state.get()
    }
}

impl Drop for NativeAudioBackend {
    fn drop(&mut self) {
        self.clear_progress_poll();
    }
}

impl fmt::Debug for NativeAudioBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeAudioBackend")
            .field("initialized", &self.is_initialized())
            .field("poll", &self.poll.get())
            .field("state", &self.state.get())
            .field("events", &self.events)
            .finish()
    }
}
