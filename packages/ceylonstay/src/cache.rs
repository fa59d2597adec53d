//! Short-lived snapshot cache for collection reads.
//!
//! An explicit, injectable object rather than module-level state: the store
//! client owns one instance, and tests drive expiry deterministically
//! through the [`Clock`] seam. There is deliberately no invalidation on
//! write; see DESIGN.md for the staleness trade-off.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Time source for cache expiry. Swap in [`ManualClock`] in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for deterministic expiry tests.
pub struct ManualClock {
    now: RwLock<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: RwLock::new(Instant::now()),
        }
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.write().expect("clock lock poisoned");
        *now += delta;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.read().expect("clock lock poisoned")
    }
}

struct Entry<T> {
    data: T,
    stored_at: Instant,
}

/// Map of key → snapshot with a fixed time-to-live.
///
/// Concurrent readers during the validity window all see the same snapshot.
/// Two overlapping first fetches may both miss and both store; they store
/// equivalent data, so the race is accepted.
pub struct SnapshotCache<T> {
    entries: RwLock<HashMap<String, Entry<T>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> SnapshotCache<T> {
    /// A cache on wall-clock time.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// The stored snapshot for `key`, if it is still within the TTL.
    pub fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().expect("cache lock poisoned");
        let entry = entries.get(key)?;
        if self.clock.now().duration_since(entry.stored_at) < self.ttl {
            Some(entry.data.clone())
        } else {
            None
        }
    }

    /// Store (or overwrite) the snapshot for `key` at the current time.
    pub fn put(&self, key: &str, data: T) {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries.insert(
            key.to_string(),
            Entry {
                data,
                stored_at: self.clock.now(),
            },
        );
    }

    /// Drop the snapshot for `key`. Not called by the store itself; exposed
    /// for callers that need read-after-write freshness.
    pub fn invalidate(&self, key: &str) {
        self.entries
            .write()
            .expect("cache lock poisoned")
            .remove(key);
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
