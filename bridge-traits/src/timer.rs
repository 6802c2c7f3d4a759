//! Periodic timer scheduling.
//!
//! The native adapter polls download progress on a fixed interval. Hosts
//! provide the timer source: a browser `setInterval`, a tokio `LocalSet`
//! (see `bridge-desktop`), or the deterministic [`ManualIntervalScheduler`]
//! shipped here for tests and headless hosts.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use crate::error::{BridgeError, Result};

/// Identifier of a scheduled interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Callback run on every interval tick.
pub type IntervalCallback = Box<dyn FnMut()>;

/// Repeating timer source.
///
/// Callbacks run on the host's single event thread and never overlap. A
/// callback may clear its own interval while running.
pub trait IntervalScheduler {
    /// Run `callback` every `period` until cleared. The first run happens one
    /// `period` after scheduling.
    fn set_interval(&self, period: Duration, callback: IntervalCallback) -> Result<TimerId>;

    /// Stop an interval. Unknown or already-cleared ids are ignored.
    fn clear_interval(&self, id: TimerId);

    /// Whether `id` is still scheduled.
    fn is_active(&self, id: TimerId) -> bool;
}

struct ManualTimer {
    period: Duration,
    callback: Rc<RefCell<IntervalCallback>>,
}

/// Scheduler whose intervals only fire when [`tick`](Self::tick) or
/// [`advance`](Self::advance) is called.
#[derive(Default)]
pub struct ManualIntervalScheduler {
    timers: RefCell<BTreeMap<TimerId, ManualTimer>>,
    next_id: Cell<u64>,
}

impl ManualIntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live intervals.
    pub fn active_count(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Period of a live interval.
    pub fn period(&self, id: TimerId) -> Option<Duration> {
        self.timers.borrow().get(&id).map(|timer| timer.period)
    }

    /// Fire every live interval once, in creation order. Returns how many
    /// callbacks ran.
    pub fn tick(&self) -> usize {
        let due: Vec<(TimerId, Rc<RefCell<IntervalCallback>>)> = self
            .timers
            .borrow()
            .iter()
            .map(|(id, timer)| (*id, Rc::clone(&timer.callback)))
            .collect();

        let mut fired = 0;
        for (id, callback) in due {
            // An earlier callback in this round may have cleared it.
            if !self.is_active(id) {
                continue;
            }
            let Ok(mut callback) = callback.try_borrow_mut() else {
                continue;
            };
            (*callback)();
            fired += 1;
        }
        fired
    }

    /// Fire `rounds` ticks back to back. Returns the total callbacks run.
    pub fn advance(&self, rounds: usize) -> usize {
        (0..rounds).map(|_| self.tick()).sum()
    }
}

impl IntervalScheduler for ManualIntervalScheduler {
    fn set_interval(&self, period: Duration, callback: IntervalCallback) -> Result<TimerId> {
        if period.is_zero() {
            return Err(BridgeError::InvalidArgument(
                "interval period must be non-zero".to_string(),
            ));
        }
        let id = TimerId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        self.timers.borrow_mut().insert(
            id,
            ManualTimer {
                period,
                callback: Rc::new(RefCell::new(callback)),
            },
        );
        Ok(id)
    }

    fn clear_interval(&self, id: TimerId) {
        self.timers.borrow_mut().remove(&id);
    }

    fn is_active(&self, id: TimerId) -> bool {
        self.timers.borrow().contains_key(&id)
    }
}
