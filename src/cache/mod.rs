//! Per-entity-type cache bucket, retention queue, and network timer.
//!
//! [`EntityCache`] is the shared mutable aggregate for one entity type:
//! the record bucket, the insertion-ordered retention queue used only
//! for eviction, and the running-mean latency timer read by the preload
//! planner. One mutex guards the whole aggregate so insert-then-evict
//! is atomic from a caller's point of view — the queue and the bucket
//! never disagree about which keys exist.
//!
//! The lock is a `std::sync::Mutex` and is never held across an await;
//! all mutations happen synchronously between fetch suspension points.

pub mod freshness;
pub mod key;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::telemetry;
use crate::types::CacheEntry;

pub use freshness::should_fetch;
pub use key::{CacheKey, encode};

/// Shared handle to one entity type's cache aggregate.
pub type SharedCache = Arc<Mutex<EntityCache>>;

/// Lock a shared cache, recovering from poisoning.
///
/// Cache state is a plain map + queue; a panic in another thread can't
/// leave it torn mid-operation, so the poisoned guard is safe to reuse.
pub(crate) fn lock(cache: &SharedCache) -> MutexGuard<'_, EntityCache> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Running-mean network latency for one entity type.
///
/// Updated by the fetch orchestrator after every completed fetch; read
/// by the preload planner's adaptive gate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkTimer {
    pub average_ms: f64,
    pub calls: u64,
}

impl NetworkTimer {
    /// Fold one sample into the running mean over `calls + 1` samples.
    pub fn record(&mut self, elapsed: Duration) {
        let sample = elapsed.as_secs_f64() * 1000.0;
        self.average_ms = (self.average_ms * self.calls as f64 + sample) / (self.calls as f64 + 1.0);
        self.calls += 1;
    }
}

/// Cache bucket, retention queue, and timer for one entity type.
#[derive(Debug)]
pub struct EntityCache {
    bucket: String,
    entries: HashMap<CacheKey, CacheEntry>,
    retention: VecDeque<CacheKey>,
    timer: NetworkTimer,
}

impl EntityCache {
    /// Create an empty cache for the given bucket name.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            entries: HashMap::new(),
            retention: VecDeque::new(),
            timer: NetworkTimer::default(),
        }
    }

    /// Create a shared handle to a fresh cache.
    pub fn shared(bucket: impl Into<String>) -> SharedCache {
        Arc::new(Mutex::new(Self::new(bucket)))
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn get(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite the entry for a key, returning the previous
    /// entry if there was one.
    pub fn insert(&mut self, key: CacheKey, entry: CacheEntry) -> Option<CacheEntry> {
        self.entries.insert(key, entry)
    }

    /// Remove the entry for a key. Does not touch the retention queue;
    /// the key simply evicts as a no-op when it reaches the front.
    pub fn remove(&mut self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn timer(&self) -> &NetworkTimer {
        &self.timer
    }

    /// Record one fetch latency sample.
    pub fn record_latency(&mut self, elapsed: Duration) {
        self.timer.record(elapsed);
    }

    /// Number of keys currently tracked for retention.
    pub fn retention_len(&self) -> usize {
        self.retention.len()
    }

    /// Register `key` with the retention queue and evict beyond `limit`.
    ///
    /// Move-to-end on duplicate push, so the queue approximates LRU
    /// order. Eviction pops the oldest keys until the queue fits the
    /// limit, removing each from the bucket in the same step. The
    /// just-pushed key sits at the back and is never evicted by its own
    /// push.
    pub fn retain(&mut self, key: &CacheKey, limit: usize) {
        if let Some(pos) = self.retention.iter().position(|k| k == key) {
            self.retention.remove(pos);
        }
        self.retention.push_back(key.clone());

        while self.retention.len() > limit {
            if self.retention.front() == Some(key) {
                break;
            }
            if let Some(oldest) = self.retention.pop_front() {
                self.entries.remove(&oldest);
                metrics::counter!(telemetry::EVICTIONS_TOTAL, "bucket" => self.bucket.clone())
                    .increment(1);
            }
        }
    }
}
