//! # Event Bus System
//!
//! Per-object publish/subscribe used uniformly by both playback backends and
//! the player facade.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **Event Types**: [`PlayerEvent`], the normalized vocabulary every backend
//!   speaks, and its payload-free discriminant [`EventKind`]
//! - **EventBus**: ordered listener lists keyed by [`EventKind`]
//! - **Observable**: composable capability giving any owner of a bus the
//!   `on`/`off`/`trigger` surface
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  trigger   ┌──────────┐  listener  ┌────────────┐  trigger  ┌──────────┐
//! │ Native/Plugin├───────────>│ backend  ├───────────>│   Player   ├──────────>│ player   ├──> callers
//! │   adapter    │            │ EventBus │            │  (facade)  │           │ EventBus │
//! └──────────────┘            └──────────┘            └────────────┘           └──────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{listener, EventBus, EventKind, PlayerEvent};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let bus = EventBus::new();
//! let last = Rc::new(Cell::new(0u8));
//! let seen = Rc::clone(&last);
//!
//! let on_progress = listener(move |event| {
//!     if let PlayerEvent::Progress { percent } = event {
//!         seen.set(*percent);
//!     }
//! });
//! bus.on(EventKind::Progress, on_progress.clone());
//!
//! bus.trigger(PlayerEvent::Progress { percent: 40 });
//! assert_eq!(last.get(), 40);
//!
//! assert!(bus.off(EventKind::Progress, &on_progress));
//! bus.trigger(PlayerEvent::Progress { percent: 90 });
//! assert_eq!(last.get(), 40);
//! ```
//!
//! ## Dispatch Semantics
//!
//! - Listeners run synchronously, in subscription order.
//! - The listener list is snapshotted when `trigger` starts, so listeners may
//!   subscribe, unsubscribe or trigger again without affecting the current
//!   dispatch.
//! - A listener that panics is logged and skipped; the remaining listeners
//!   still run.
//!
//! ## Threading
//!
//! Buses are single-threaded (`!Send`). Every backend and every player owns
//! its own bus; buses are never shared between unrelated objects.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::str::FromStr;

// ============================================================================
// Event Types
// ============================================================================

/// Normalized playback event, emitted identically by every backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum PlayerEvent {
    /// Backend finished initializing and accepts commands.
    Ready,
    /// Playback started or resumed.
    Play,
    /// Playback paused.
    Pause,
    /// Playback reached the end of the track.
    Ended,
    /// Playhead moved.
    TimeUpdate {
        /// Playhead position (seconds).
        position: f64,
        /// Track duration (seconds).
        duration: f64,
    },
    /// Download progress changed.
    Progress {
        /// Downloaded share of the track, `0..=100`.
        percent: u8,
    },
    /// The current source failed to load.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

impl PlayerEvent {
    /// Kind used for subscription routing.
    pub fn kind(&self) -> EventKind {
        match self {
            PlayerEvent::Ready => EventKind::Ready,
            PlayerEvent::Play => EventKind::Play,
            PlayerEvent::Pause => EventKind::Pause,
            PlayerEvent::Ended => EventKind::Ended,
            PlayerEvent::TimeUpdate { .. } => EventKind::TimeUpdate,
            PlayerEvent::Progress { .. } => EventKind::Progress,
            PlayerEvent::Error { .. } => EventKind::Error,
        }
    }

    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            PlayerEvent::Ready => "Player ready",
            PlayerEvent::Play => "Playback started",
            PlayerEvent::Pause => "Playback paused",
            PlayerEvent::Ended => "Track ended",
            PlayerEvent::TimeUpdate { .. } => "Playback position changed",
            PlayerEvent::Progress { .. } => "Download progress changed",
            PlayerEvent::Error { .. } => "Load error",
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            PlayerEvent::Error { .. } => EventSeverity::Error,
            PlayerEvent::Ready => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

/// Payload-free discriminant of [`PlayerEvent`], used as the channel key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Ready,
    Play,
    Pause,
    Ended,
    TimeUpdate,
    Progress,
    Error,
}

impl EventKind {
    /// Every normalized event kind, in documentation order.
    pub const ALL: [EventKind; 7] = [
        EventKind::Ready,
        EventKind::Play,
        EventKind::Pause,
        EventKind::Ended,
        EventKind::TimeUpdate,
        EventKind::Progress,
        EventKind::Error,
    ];

    /// Wire name of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Ready => "ready",
            EventKind::Play => "play",
            EventKind::Pause => "pause",
            EventKind::Ended => "ended",
            EventKind::TimeUpdate => "timeupdate",
            EventKind::Progress => "progress",
            EventKind::Error => "error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown event: {s}"))
    }
}

// ============================================================================
// Listeners
// ============================================================================

/// Subscribed callback. Identity (for [`EventBus::off`]) is the `Rc`
/// allocation, so keep a clone of the listener to unsubscribe it later.
pub type Listener = Rc<dyn Fn(&PlayerEvent)>;

/// Wrap a closure as a [`Listener`].
pub fn listener<F>(callback: F) -> Listener
where
    F: Fn(&PlayerEvent) + 'static,
{
    Rc::new(callback)
}

/// Build a listener bound to `context`.
///
/// The context is held weakly: once its last strong reference is dropped the
/// listener does nothing, so a subscription never keeps its owner alive.
///
/// ```rust
/// use core_runtime::events::{bind, EventBus, EventKind, PlayerEvent};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// struct Counter { hits: Cell<u32> }
///
/// let bus = EventBus::new();
/// let counter = Rc::new(Counter { hits: Cell::new(0) });
/// bus.on(EventKind::Play, bind(&counter, |c, _| c.hits.set(c.hits.get() + 1)));
///
/// bus.trigger(PlayerEvent::Play);
/// assert_eq!(counter.hits.get(), 1);
/// ```
pub fn bind<C, F>(context: &Rc<C>, handler: F) -> Listener
where
    C: 'static,
    F: Fn(&C, &PlayerEvent) + 'static,
{
    let context = Rc::downgrade(context);
    Rc::new(move |event| {
        if let Some(context) = context.upgrade() {
            handler(&context, event);
        }
    })
}

// ============================================================================
// Event Bus
// ============================================================================

/// Ordered listener lists keyed by event kind.
#[derive(Default)]
pub struct EventBus {
    channels: RefCell<HashMap<EventKind, Vec<Listener>>>,
}

impl EventBus {
    /// Creates an empty event bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for `kind`.
    ///
    /// The same listener may be registered more than once; it then fires once
    /// per registration.
    pub fn on(&self, kind: EventKind, listener: Listener) {
        self.channels
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(listener);
    }

    /// Removes the first registration of `listener` for `kind`.
    ///
    /// Returns `false` when nothing matched. Remaining registrations keep
    /// their order.
    pub fn off(&self, kind: EventKind, listener: &Listener) -> bool {
        let mut channels = self.channels.borrow_mut();
        let Some(subscribers) = channels.get_mut(&kind) else {
            return false;
        };
        match subscribers
            .iter()
            .position(|registered| Rc::ptr_eq(registered, listener))
        {
            Some(index) => {
                subscribers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Publishes `event` to every listener currently registered for its kind.
    ///
    /// Returns the number of listeners that ran to completion.
    pub fn trigger(&self, event: PlayerEvent) -> usize {
        let kind = event.kind();
        let subscribers: Vec<Listener> = match self.channels.borrow().get(&kind) {
            Some(subscribers) if !subscribers.is_empty() => subscribers.clone(),
            _ => return 0,
        };

        tracing::trace!(event = %kind, listeners = subscribers.len(), "Dispatching event");

        let mut completed = 0;
        for subscriber in subscribers {
            match panic::catch_unwind(AssertUnwindSafe(|| subscriber(&event))) {
                Ok(()) => completed += 1,
                Err(_) => {
                    tracing::error!(event = %kind, "Event listener panicked; continuing dispatch");
                }
            }
        }
        completed
    }

    /// Number of registrations for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.channels.borrow().get(&kind).map_or(0, Vec::len)
    }

    /// Whether anything is registered for `kind`.
    pub fn has_listeners(&self, kind: EventKind) -> bool {
        self.listener_count(kind) > 0
    }

    /// Drops every registration.
    pub fn clear(&self) {
        self.channels.borrow_mut().clear();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channels = self.channels.borrow();
        let counts: HashMap<&'static str, usize> = channels
            .iter()
            .map(|(kind, subscribers)| (kind.as_str(), subscribers.len()))
            .collect();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

// ============================================================================
// Observable Capability
// ============================================================================

/// Publish/subscribe surface for anything that owns an [`EventBus`].
pub trait Observable {
    /// The owned bus.
    fn events(&self) -> &EventBus;

    /// See [`EventBus::on`].
    fn on(&self, kind: EventKind, listener: Listener) {
        self.events().on(kind, listener);
    }

    /// See [`EventBus::off`].
    fn off(&self, kind: EventKind, listener: &Listener) -> bool {
        self.events().off(kind, listener)
    }

    /// See [`EventBus::trigger`].
    fn trigger(&self, event: PlayerEvent) -> usize {
        self.events().trigger(event)
    }
}

impl Observable for EventBus {
    fn events(&self) -> &EventBus {
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
