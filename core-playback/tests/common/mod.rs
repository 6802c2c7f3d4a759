//! Shared fakes for backend integration tests.

#![allow(dead_code)]

use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::playback::{
    MediaElementFactory, MediaEvent, MediaEventCallback, NativeMediaElement, Preload, TimeRanges,
};
use core_runtime::events::{listener, EventKind, Observable, PlayerEvent};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// In-memory media element. Engine events fire only when the test calls
/// [`FakeMediaElement::fire`], except `play`/`pause` which echo their event
/// when `echo_events` is set, like a real element does.
#[derive(Default)]
pub struct FakeMediaElement {
    listeners: RefCell<HashMap<MediaEvent, Vec<MediaEventCallback>>>,
    pub calls: RefCell<Vec<String>>,
    pub preload: Cell<Option<Preload>>,
    pub src: RefCell<Option<String>>,
    pub current_time: Cell<f64>,
    pub duration: Cell<f64>,
    pub volume: Cell<f32>,
    pub buffered: RefCell<TimeRanges>,
    pub seekable: RefCell<TimeRanges>,
    pub echo_events: Cell<bool>,
    pub reject_play: Cell<bool>,
}

impl FakeMediaElement {
    pub fn new() -> Rc<Self> {
        let element = Self::default();
        element.duration.set(f64::NAN);
        element.echo_events.set(true);
        Rc::new(element)
    }

    pub fn fire(&self, event: MediaEvent) {
        let listeners = self.listeners.borrow();
        if let Some(callbacks) = listeners.get(&event) {
            for callback in callbacks {
                callback();
            }
        }
    }

    pub fn listener_count(&self, event: MediaEvent) -> usize {
        self.listeners.borrow().get(&event).map_or(0, Vec::len)
    }

    pub fn set_buffered(&self, ranges: TimeRanges) {
        *self.buffered.borrow_mut() = ranges;
    }

    pub fn set_seekable(&self, ranges: TimeRanges) {
        *self.seekable.borrow_mut() = ranges;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }
}

impl NativeMediaElement for FakeMediaElement {
    fn set_preload(&self, preload: Preload) {
        self.preload.set(Some(preload));
    }

    fn set_src(&self, url: &str) {
        self.record(format!("set_src:{url}"));
        *self.src.borrow_mut() = Some(url.to_string());
    }

    fn load(&self) {
        self.record("load");
    }

    fn play(&self) -> BridgeResult<()> {
        if self.reject_play.get() {
            return Err(BridgeError::OperationFailed("autoplay blocked".to_string()));
        }
        self.record("play");
        if self.echo_events.get() {
            self.fire(MediaEvent::Play);
        }
        Ok(())
    }

    fn pause(&self) {
        self.record("pause");
        if self.echo_events.get() {
            self.fire(MediaEvent::Pause);
        }
    }

    fn current_time(&self) -> f64 {
        self.current_time.get()
    }

    fn set_current_time(&self, seconds: f64) {
        self.record(format!("set_current_time:{seconds}"));
        self.current_time.set(seconds);
    }

    fn duration(&self) -> f64 {
        self.duration.get()
    }

    fn set_volume(&self, volume: f32) {
        self.record(format!("set_volume:{volume}"));
        self.volume.set(volume);
    }

    fn buffered(&self) -> TimeRanges {
        self.buffered.borrow().clone()
    }

    fn seekable(&self) -> TimeRanges {
        self.seekable.borrow().clone()
    }

    fn add_event_listener(&self, event: MediaEvent, callback: MediaEventCallback) {
        self.listeners
            .borrow_mut()
            .entry(event)
            .or_default()
            .push(callback);
    }
}

/// Factory handing out one pre-built fake element.
pub struct FakeFactory {
    pub element: Rc<FakeMediaElement>,
    pub created: Cell<usize>,
}

impl FakeFactory {
    pub fn new(element: Rc<FakeMediaElement>) -> Rc<Self> {
        Rc::new(Self {
            element,
            created: Cell::new(0),
        })
    }
}

impl MediaElementFactory for FakeFactory {
    fn create(&self) -> BridgeResult<Rc<dyn NativeMediaElement>> {
        self.created.set(self.created.get() + 1);
        Ok(self.element.clone())
    }
}

/// Records every event published on an observable.
pub fn record_events(target: &dyn Observable) -> Rc<RefCell<Vec<PlayerEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for kind in EventKind::ALL {
        let sink = Rc::clone(&log);
        target.on(
            kind,
            listener(move |event| sink.borrow_mut().push(event.clone())),
        );
    }
    log
}

/// Kinds of the recorded events, in order.
pub fn kinds(log: &RefCell<Vec<PlayerEvent>>) -> Vec<EventKind> {
    log.borrow().iter().map(PlayerEvent::kind).collect()
}

/// Percent payloads of the recorded progress events.
pub fn progress_values(log: &RefCell<Vec<PlayerEvent>>) -> Vec<u8> {
    log.borrow()
        .iter()
        .filter_map(|event| match event {
            PlayerEvent::Progress { percent } => Some(*percent),
            _ => None,
        })
        .collect()
}
