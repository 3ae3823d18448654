//! Cancellable one-shot timers.
//!
//! A scheduler never calls back into its owner. Expiry is reported as a
//! [`TimerId`], and the owner decides whether the id is still current, so a
//! timer whose handle was already dropped can at worst deliver a stale id.

use std::{
    collections::BTreeSet,
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Owning handle for a scheduled timer. Dropping it cancels the timer.
pub struct TimerHandle {
    id: TimerId,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerHandle {
    pub fn new(id: TimerId, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle").field("id", &self.id).finish()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration) -> TimerHandle;
}

/// Runtime-backed scheduler. Each timer is a sleeping task; expired ids arrive
/// on the receiver returned by [`TokioScheduler::new`].
pub struct TokioScheduler {
    next_id: AtomicU64,
    fired: mpsc::UnboundedSender<TimerId>,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerId>) {
        let (fired, rx) = mpsc::unbounded_channel();
        (
            Self {
                next_id: AtomicU64::new(1),
                fired,
            },
            rx,
        )
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration) -> TimerHandle {
        let id = TimerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let fired = self.fired.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = fired.send(id);
        });
        TimerHandle::new(id, move || task.abort())
    }
}

#[derive(Debug, Default)]
struct VirtualClock {
    now: Duration,
    next_id: u64,
    pending: BTreeSet<(Duration, TimerId)>,
}

/// Deterministic scheduler driven by [`ManualScheduler::advance`].
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<VirtualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VirtualClock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn now(&self) -> Duration {
        self.lock().now
    }

    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Moves the clock forward, handing every timer that comes due to `fire` in
    /// deadline order. Timers scheduled from inside `fire` are honored if they
    /// fall within the same window.
    pub fn advance(&self, by: Duration, mut fire: impl FnMut(TimerId)) {
        let target = self.lock().now + by;
        loop {
            let due = {
                let mut clock = self.lock();
                let first = clock.pending.first().copied();
                match first {
                    Some((deadline, id)) if deadline <= target => {
                        clock.pending.remove(&(deadline, id));
                        clock.now = deadline;
                        Some(id)
                    }
                    _ => None,
                }
            };
            match due {
                Some(id) => fire(id),
                None => break,
            }
        }
        self.lock().now = target;
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration) -> TimerHandle {
        let mut clock = self.lock();
        clock.next_id += 1;
        let id = TimerId(clock.next_id);
        let deadline = clock.now + delay;
        clock.pending.insert((deadline, id));
        drop(clock);

        let shared = Arc::clone(&self.clock);
        TimerHandle::new(id, move || {
            shared
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pending
                .remove(&(deadline, id));
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_timers_fire_in_deadline_order() {
        let scheduler = ManualScheduler::new();
        let late = scheduler.schedule(Duration::from_millis(300));
        let early = scheduler.schedule(Duration::from_millis(100));

        let mut fired = Vec::new();
        scheduler.advance(Duration::from_millis(500), |id| fired.push(id));
        assert_eq!(fired, vec![early.id(), late.id()]);
        assert_eq!(scheduler.now(), Duration::from_millis(500));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn dropped_handle_cancels_manual_timer() {
        let scheduler = ManualScheduler::new();
        let handle = scheduler.schedule(Duration::from_millis(100));
        assert_eq!(scheduler.pending(), 1);
        handle.cancel();
        assert_eq!(scheduler.pending(), 0);

        let mut fired = Vec::new();
        scheduler.advance(Duration::from_secs(1), |id| fired.push(id));
        assert!(fired.is_empty());
    }

    #[test]
    fn timers_not_yet_due_stay_pending() {
        let scheduler = ManualScheduler::new();
        let _handle = scheduler.schedule(Duration::from_millis(1000));

        let mut fired = Vec::new();
        scheduler.advance(Duration::from_millis(999), |id| fired.push(id));
        assert!(fired.is_empty());
        scheduler.advance(Duration::from_millis(1), |id| fired.push(id));
        assert_eq!(fired.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_timer_reports_its_id() {
        let (scheduler, mut fired) = TokioScheduler::new();
        let handle = scheduler.schedule(Duration::from_millis(50));
        assert_eq!(fired.recv().await, Some(handle.id()));
    }

    #[tokio::test(start_paused = true)]
    async fn aborted_tokio_timer_never_reports() {
        let (scheduler, mut fired) = TokioScheduler::new();
        let cancelled = scheduler.schedule(Duration::from_millis(50));
        let kept = scheduler.schedule(Duration::from_millis(100));
        cancelled.cancel();

        assert_eq!(fired.recv().await, Some(kept.id()));
    }
}
