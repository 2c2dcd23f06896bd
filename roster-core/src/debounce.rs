//! Debounce Scheduler: keyed cancel-and-replace timers.
//!
//! Each key owns at most one pending timer. Scheduling under a key that
//! already has a pending timer aborts it and takes its place, so only the most
//! recently scheduled callback for a key ever runs. Re-scheduling is the only
//! way to cancel.
//!
//! Timers run as tokio tasks. Outside a runtime [`Debouncer::debounce`] logs
//! a warning and schedules nothing. Callbacks never run synchronously, not
//! even with a zero delay.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::AbortHandle;
use tracing::{trace, warn};

/// Delay used by [`Debouncer::debounce_default`].
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

/// Shared, cloneable debounce timer table.
#[derive(Clone)]
pub struct Debouncer {
    inner: Arc<Mutex<DebounceInner>>,
    default_delay: Duration,
}

struct DebounceInner {
    timers: HashMap<String, PendingTimer>,
    next_generation: u64,
    total_scheduled: u64,
    total_superseded: u64,
    total_fired: u64,
}

struct PendingTimer {
    generation: u64,
    handle: AbortHandle,
}

/// Counters describing debounce activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceStats {
    /// Timers currently waiting.
    pub pending: usize,
    /// Total timers scheduled.
    pub total_scheduled: u64,
    /// Timers replaced before they fired.
    pub total_superseded: u64,
    /// Callbacks that actually ran.
    pub total_fired: u64,
}

impl Debouncer {
    /// Create a debouncer with the standard 300ms default delay.
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_delay(DEFAULT_DELAY)
    }

    /// Create a debouncer with a custom default delay.
    #[must_use]
    pub fn with_default_delay(default_delay: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(DebounceInner {
                timers: HashMap::new(),
                next_generation: 0,
                total_scheduled: 0,
                total_superseded: 0,
                total_fired: 0,
            })),
            default_delay,
        }
    }

    /// Schedule `callback` under `key` after the default delay.
    pub fn debounce_default<F>(&self, key: impl Into<String>, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.debounce(key, self.default_delay, callback);
    }

    /// Cancel whatever is pending under `key` and schedule `callback` to run
    /// after `delay`. The timer record is removed when the callback fires.
    ///
    /// Called outside a tokio runtime, the callback is dropped and any pending
    /// timer under `key` is left as it was.
    pub fn debounce<F>(&self, key: impl Into<String>, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let key = key.into();
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(key = %key, "No tokio runtime; debounce timer dropped");
            return;
        };
        let mut inner = self.inner.lock();

        let generation = inner.next_generation;
        inner.next_generation += 1;
        inner.total_scheduled += 1;

        if let Some(previous) = inner.timers.remove(&key) {
            previous.handle.abort();
            inner.total_superseded += 1;
            trace!(key = %key, superseded = previous.generation, "Debounce timer replaced");
        }

        let shared = Arc::clone(&self.inner);
        let task_key = key.clone();
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut inner = shared.lock();
                // An abort can race with the wake-up; only the current
                // generation for this key may fire.
                match inner.timers.get(&task_key) {
                    Some(timer) if timer.generation == generation => {
                        inner.timers.remove(&task_key);
                        inner.total_fired += 1;
                    }
                    _ => return,
                }
            }
            trace!(key = %task_key, generation, "Debounce timer fired");
            callback();
        })
        .abort_handle();

        inner.timers.insert(key, PendingTimer { generation, handle });
    }

    /// Whether a timer is pending under `key`.
    #[must_use]
    pub fn pending(&self, key: &str) -> bool {
        self.inner.lock().timers.contains_key(key)
    }

    /// Number of pending timers across all keys.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.lock().timers.len()
    }

    /// Snapshot of debounce counters.
    #[must_use]
    pub fn stats(&self) -> DebounceStats {
        let inner = self.inner.lock();
        DebounceStats {
            pending: inner.timers.len(),
            total_scheduled: inner.total_scheduled,
            total_superseded: inner.total_superseded,
            total_fired: inner.total_fired,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("default_delay", &self.default_delay)
            .field("stats", &self.stats())
            .finish()
    }
}
