//! Fetch orchestration.
//!
//! [`Fetcher`] is the one place that talks to the store for queries:
//! it writes the loading sentinel before the network call, writes the
//! resolved record on success, folds the latency sample into the
//! network timer, and registers the key with the retention queue.
//!
//! The sentinel is written synchronously before the first await, so a
//! concurrent caller routing through the freshness check sees it and
//! does not issue a duplicate fetch for the same key. On failure the
//! key's pre-fetch entry is restored — a dangling sentinel would block
//! every future retry for that key.

use std::sync::Arc;
use std::time::Instant;

use crate::cache::{self, SharedCache};
use crate::store::EntityStore;
use crate::types::{CacheEntry, CacheRecord, QueryParams};
use crate::{Result, telemetry};

pub(crate) struct Fetcher {
    entity: String,
    store: Arc<dyn EntityStore>,
    cache: SharedCache,
    retain: usize,
    result_field: Option<String>,
}

impl Fetcher {
    pub(crate) fn new(
        entity: impl Into<String>,
        store: Arc<dyn EntityStore>,
        cache: SharedCache,
        retain: usize,
        result_field: Option<String>,
    ) -> Self {
        Self {
            entity: entity.into(),
            store,
            cache,
            retain,
            result_field,
        }
    }

    /// Fetch one query and update the cache for its key.
    ///
    /// `mark_loading` writes the sentinel up front; `is_preload` tags
    /// the resulting record with `preloaded_at`; `adaptive_skip` is
    /// forwarded to the transport untouched.
    pub(crate) async fn fetch(
        &self,
        url: &str,
        params: &QueryParams,
        mark_loading: bool,
        is_preload: bool,
        adaptive_skip: bool,
    ) -> Result<()> {
        let key = cache::encode(url, params);

        let previous = if mark_loading {
            cache::lock(&self.cache).insert(key.clone(), CacheEntry::Loading)
        } else {
            None
        };

        let started = Instant::now();
        match self.store.fetch(url, params, adaptive_skip).await {
            Ok(payload) => {
                let elapsed = started.elapsed();
                let record = CacheRecord::from_response(
                    payload,
                    self.result_field.as_deref(),
                    is_preload.then(Instant::now),
                );

                let mut cache = cache::lock(&self.cache);
                cache.record_latency(elapsed);
                cache.insert(key.clone(), CacheEntry::Ready(record));
                cache.retain(&key, self.retain);
                drop(cache);

                metrics::counter!(telemetry::FETCHES_TOTAL,
                    "entity" => self.entity.clone(),
                    "preload" => if is_preload { "true" } else { "false" },
                    "status" => "ok",
                )
                .increment(1);
                Ok(())
            }
            Err(e) => {
                if mark_loading {
                    let mut cache = cache::lock(&self.cache);
                    match previous {
                        Some(entry) => {
                            cache.insert(key, entry);
                        }
                        None => {
                            cache.remove(&key);
                        }
                    }
                }

                metrics::counter!(telemetry::FETCHES_TOTAL,
                    "entity" => self.entity.clone(),
                    "preload" => if is_preload { "true" } else { "false" },
                    "status" => "error",
                )
                .increment(1);
                Err(e)
            }
        }
    }
}
