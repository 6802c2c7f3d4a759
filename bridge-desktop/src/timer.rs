//! Interval Scheduling Implementation

use bridge_traits::{
    error::{BridgeError, Result},
    timer::{IntervalCallback, IntervalScheduler, TimerId},
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::LocalSet;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Tokio-based interval scheduler for desktop hosts.
///
/// Intervals run as local tasks on an owned [`LocalSet`], so callbacks stay on
/// the player's thread. They only make progress while the host drives the set
/// through [`run_until`](Self::run_until).
pub struct TokioIntervalScheduler {
    local: LocalSet,
    timers: RefCell<HashMap<TimerId, oneshot::Sender<()>>>,
    next_id: Cell<u64>,
}

impl TokioIntervalScheduler {
    pub fn new() -> Self {
        Self {
            local: LocalSet::new(),
            timers: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    /// Drive scheduled intervals until `future` completes.
    pub async fn run_until<F: Future>(&self, future: F) -> F::Output {
        self.local.run_until(future).await
    }

    /// Number of live intervals.
    pub fn active_count(&self) -> usize {
        self.timers.borrow().len()
    }

    async fn run_interval(
        id: TimerId,
        period: Duration,
        mut callback: IntervalCallback,
        mut cancel_rx: oneshot::Receiver<()>,
    ) {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                // Fires on explicit cancel and when the sender is dropped
                _ = &mut cancel_rx => {
                    debug!(timer = id.0, "Interval cancelled");
                    break;
                }
                _ = ticker.tick() => callback(),
            }
        }
    }
}

impl Default for TokioIntervalScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalScheduler for TokioIntervalScheduler {
    fn set_interval(&self, period: Duration, callback: IntervalCallback) -> Result<TimerId> {
        if period.is_zero() {
            return Err(BridgeError::InvalidArgument(
                "interval period must be non-zero".to_string(),
            ));
        }

        let id = TimerId(self.next_id.get() + 1);
        self.next_id.set(id.0);

        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.timers.borrow_mut().insert(id, cancel_tx);
        self.local
            .spawn_local(Self::run_interval(id, period, callback, cancel_rx));

        debug!(timer = id.0, period_ms = period.as_millis() as u64, "Interval scheduled");
        Ok(id)
    }

    fn clear_interval(&self, id: TimerId) {
        let cancel = self.timers.borrow_mut().remove(&id);
        if let Some(cancel) = cancel {
            let _ = cancel.send(());
        }
    }

    fn is_active(&self, id: TimerId) -> bool {
        self.timers.borrow().contains_key(&id)
    }
}
