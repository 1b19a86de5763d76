//! Tracking of in-flight output operations.
//!
//! Every write or copy registers itself with [`WriteTracker::begin`] and
//! settles with [`WriteTracker::end`], successful or not. Callers that need
//! the output tree to be complete register a continuation with
//! [`WriteTracker::run_when_idle`] or await [`WriteTracker::wait_idle`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::oneshot;

type Continuation = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct TrackerState {
    in_flight: HashSet<PathBuf>,
    on_idle: Vec<Continuation>,
}

/// Cloneable handle to a shared set of in-flight operations.
#[derive(Clone, Default)]
pub struct WriteTracker {
    state: Arc<Mutex<TrackerState>>,
}

impl std::fmt::Debug for WriteTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("WriteTracker")
            .field("in_flight", &state.in_flight.len())
            .field("waiting", &state.on_idle.len())
            .finish()
    }
}

impl WriteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` as in flight.
    pub fn begin(&self, id: impl Into<PathBuf>) {
        let id = id.into();
        tracing::debug!("write started: {}", id.display());
        self.lock().in_flight.insert(id);
    }

    /// Settle `id`. Runs the pending continuations when this empties the set.
    pub fn end(&self, id: &Path) {
        let ready = {
            let mut state = self.lock();
            state.in_flight.remove(id);
            if state.in_flight.is_empty() {
                std::mem::take(&mut state.on_idle)
            } else {
                Vec::new()
            }
        };

        tracing::debug!("write settled: {}", id.display());

        for continuation in ready {
            continuation();
        }
    }

    /// Run `continuation` once nothing is in flight.
    ///
    /// When the tracker is already idle the continuation runs before this call
    /// returns; otherwise it runs exactly once, from the `end` call that
    /// drains the set.
    pub fn run_when_idle<F>(&self, continuation: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut state = self.lock();
            if !state.in_flight.is_empty() {
                state.on_idle.push(Box::new(continuation));
                return;
            }
        }

        continuation();
    }

    /// Wait until nothing is in flight.
    pub async fn wait_idle(&self) {
        let (tx, rx) = oneshot::channel();
        self.run_when_idle(move || {
            let _ = tx.send(());
        });
        let _ = rx.await;
    }

    /// Number of operations currently in flight.
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight.len()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight() == 0
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let fired = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&fired);
        (fired, move || {
            handle.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn fires_immediately_when_idle() {
        let tracker = WriteTracker::new();
        let (fired, continuation) = counter();

        tracker.run_when_idle(continuation);

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fires_once_after_last_end() {
        let tracker = WriteTracker::new();
        let ids: Vec<PathBuf> = (0..5).map(|i| PathBuf::from(format!("out/{i}"))).collect();
        for id in &ids {
            tracker.begin(id.clone());
        }

        let (fired, continuation) = counter();
        tracker.run_when_idle(continuation);

        for id in &ids[..4] {
            tracker.end(id);
            assert_eq!(fired.load(Ordering::SeqCst), 0);
        }

        tracker.end(&ids[4]);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        tracker.begin("out/late");
        tracker.end(Path::new("out/late"));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn same_id_is_tracked_once() {
        let tracker = WriteTracker::new();

        tracker.begin("out/a");
        tracker.begin("out/a");

        assert_eq!(tracker.in_flight(), 1);
        tracker.end(Path::new("out/a"));
        assert!(tracker.is_idle());
    }

    #[test]
    fn queued_continuations_all_fire() {
        let tracker = WriteTracker::new();
        tracker.begin("out/a");

        let (first, c1) = counter();
        let (second, c2) = counter();
        tracker.run_when_idle(c1);
        tracker.run_when_idle(c2);
        tracker.end(Path::new("out/a"));

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn wait_idle_resolves_after_tasks_settle() {
        let tracker = WriteTracker::new();
        let done = Arc::new(AtomicUsize::new(0));

        for i in 0..8u64 {
            let id = PathBuf::from(format!("out/{i}"));
            tracker.begin(id.clone());
            let tracker = tracker.clone();
            let done = Arc::clone(&done);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(5 * (8 - i))).await;
                done.fetch_add(1, Ordering::SeqCst);
                tracker.end(&id);
            });
        }

        tracker.wait_idle().await;

        assert_eq!(done.load(Ordering::SeqCst), 8);
        assert!(tracker.is_idle());
    }
}
