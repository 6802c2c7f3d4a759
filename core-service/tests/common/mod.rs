//! Host fakes for player integration tests.

#![allow(dead_code)]

use bridge_traits::error::Result as BridgeResult;
use bridge_traits::playback::{
    MediaElementFactory, MediaEvent, MediaEventCallback, NativeMediaElement, Preload, TimeRanges,
};
use core_runtime::events::{listener, EventKind, Observable, PlayerEvent};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Media element that echoes `play`/`pause` like a browser element and
/// raises everything else only through [`FakeElement::fire`].
pub struct FakeElement {
    listeners: RefCell<HashMap<MediaEvent, Vec<MediaEventCallback>>>,
    pub calls: RefCell<Vec<&'static str>>,
    pub src: RefCell<Option<String>>,
    pub current_time: Cell<f64>,
    pub duration: Cell<f64>,
    pub volume: Cell<f32>,
    pub buffered: RefCell<TimeRanges>,
    pub seekable: RefCell<TimeRanges>,
}

impl FakeElement {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            listeners: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
            src: RefCell::new(None),
            current_time: Cell::new(0.0),
            duration: Cell::new(f64::NAN),
            volume: Cell::new(1.0),
            buffered: RefCell::new(TimeRanges::empty()),
            seekable: RefCell::new(TimeRanges::empty()),
        })
    }

    pub fn fire(&self, event: MediaEvent) {
        if let Some(callbacks) = self.listeners.borrow().get(&event) {
            for callback in callbacks {
                callback();
            }
        }
    }

    /// Make the whole track available: buffered and seekable up to `seconds`.
    pub fn buffer_fully(&self, seconds: f64) {
        self.duration.set(seconds);
        *self.buffered.borrow_mut() = TimeRanges::from_start(seconds);
        *self.seekable.borrow_mut() = TimeRanges::from_start(seconds);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl NativeMediaElement for FakeElement {
    fn set_preload(&self, _preload: Preload) {}

    fn set_src(&self, url: &str) {
        *self.src.borrow_mut() = Some(url.to_string());
    }

    fn load(&self) {
        self.calls.borrow_mut().push("load");
    }

    fn play(&self) -> BridgeResult<()> {
        self.calls.borrow_mut().push("play");
        self.fire(MediaEvent::Play);
        Ok(())
    }

    fn pause(&self) {
        self.calls.borrow_mut().push("pause");
        self.fire(MediaEvent::Pause);
    }

    fn current_time(&self) -> f64 {
        self.current_time.get()
    }

    fn set_current_time(&self, seconds: f64) {
        self.current_time.set(seconds);
    }

    fn duration(&self) -> f64 {
        self.duration.get()
    }

    fn set_volume(&self, volume: f32) {
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

pub struct FakeFactory(pub Rc<FakeElement>);

impl MediaElementFactory for FakeFactory {
    fn create(&self) -> BridgeResult<Rc<dyn NativeMediaElement>> {
        Ok(self.0.clone())
    }
}

/// Records every event republished by `target`.
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

pub fn count(log: &RefCell<Vec<PlayerEvent>>, kind: EventKind) -> usize {
    log.borrow().iter().filter(|event| event.kind() == kind).count()
}
