//! Trailing-edge debounce as a single-slot pending-task register
//!
//! At most one task waits in the slot. Scheduling while one is pending aborts
//! the pending timer and takes its place. Once the quiet period elapses the
//! task is spawned on its own, so a later `schedule` never cancels work that
//! has already started.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct Debouncer {
    quiet: Duration,
    slot: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            slot: Mutex::new(None),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Run `task` once `quiet` has passed without another `schedule` call
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // Deadline is fixed now, not when the timer task first gets polled
        let deadline = tokio::time::Instant::now() + self.quiet;
        let timer = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            tokio::spawn(task);
        });

        let previous = self
            .slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(timer);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// True while a task is waiting out its quiet period
    pub fn is_pending(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Drop the pending task, if any
    pub fn cancel(&self) {
        if let Some(handle) = self.slot.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_task(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_into_one_trailing_call() {
        let debouncer = Debouncer::new(Duration::from_millis(1000));
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            debouncer.schedule(counting_task(&fired));
            tokio::time::advance(Duration::from_millis(200)).await;
        }
        // Last schedule at t=800; it is due at t=1800
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(700)).await; // t=1700
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(200)).await; // t=1900
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn separated_edits_fire_separately() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let fired = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counting_task(&fired));
        tokio::time::sleep(Duration::from_millis(150)).await;
        settle().await;
        debouncer.schedule(counting_task(&fired));
        tokio::time::sleep(Duration::from_millis(150)).await;
        settle().await;

        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_task() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let fired = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counting_task(&fired));
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        settle().await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_does_not_cancel_started_work() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let finished = Arc::new(AtomicUsize::new(0));

        let done = finished.clone();
        debouncer.schedule(async move {
            // Simulates a slow request already in flight
            tokio::time::sleep(Duration::from_millis(500)).await;
            done.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(150)).await; // first task started
        debouncer.schedule(counting_task(&finished));
        tokio::time::sleep(Duration::from_millis(1000)).await;
        settle().await;

        assert_eq!(finished.load(Ordering::SeqCst), 2);
    }
}
