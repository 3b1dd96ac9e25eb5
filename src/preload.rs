//! Speculative preloading of predicted future queries.
//!
//! The planner delegates to an externally registered predictor: given
//! the previously active parameters, the just-merged parameters, and
//! the current response metadata, the predictor returns candidate
//! parameter sets a user is likely to ask for next (the next page, the
//! inverted sort order, ...). Each candidate not already cached is
//! fetched in a detached task with `is_preload = true`.
//!
//! Preloading is strictly best-effort: failures are logged at debug
//! and swallowed, never surfaced to the caller's state or error path.
//!
//! # Adaptive gate
//!
//! In smart mode the planner reads the entity's network timer before
//! doing anything. Once more than `min_samples` calls have been
//! recorded and the running mean exceeds the threshold, the whole
//! cycle is skipped — speculation on a slow network costs more than
//! the hit-rate is worth.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::debug;

use crate::cache::{self, SharedCache};
use crate::fetch::Fetcher;
use crate::telemetry;
use crate::types::{CacheEntry, QueryParams};

/// Prediction function registered by the consumer.
///
/// Arguments: previously active params, merged params for the current
/// query, metadata of the current cached response (empty map when none).
pub type PreloadPredictor =
    dyn Fn(&QueryParams, &QueryParams, &Map<String, Value>) -> Vec<QueryParams> + Send + Sync;

pub(crate) struct PreloadPlanner {
    entity: String,
    fetcher: Arc<Fetcher>,
    cache: SharedCache,
    smart: bool,
    threshold: Duration,
    min_samples: u64,
    predictor: Mutex<Option<Arc<PreloadPredictor>>>,
}

impl PreloadPlanner {
    pub(crate) fn new(
        entity: impl Into<String>,
        fetcher: Arc<Fetcher>,
        cache: SharedCache,
        smart: bool,
        threshold: Duration,
        min_samples: u64,
    ) -> Self {
        Self {
            entity: entity.into(),
            fetcher,
            cache,
            smart,
            threshold,
            min_samples,
            predictor: Mutex::new(None),
        }
    }

    pub(crate) fn set_predictor(&self, predictor: Arc<PreloadPredictor>) {
        *self
            .predictor
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(predictor);
    }

    /// Compute candidate future queries. No-op without a predictor.
    pub(crate) fn plan(
        &self,
        current: &QueryParams,
        merged: &QueryParams,
        meta: &Map<String, Value>,
    ) -> Vec<QueryParams> {
        let predictor = self
            .predictor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match predictor {
            Some(predict) => predict(current, merged, meta),
            None => Vec::new(),
        }
    }

    /// Spawn fetches for predictions whose keys are not yet cached.
    ///
    /// The loading sentinel is written here, under the same lock as the
    /// existence check, before the task is spawned — a spawned future
    /// runs lazily, and a direct query's freshness check must already
    /// see the sentinel by the time this call returns.
    pub(crate) fn execute(&self, predicted: Vec<QueryParams>, url: &str, base: &QueryParams) {
        for overlay in predicted {
            let params = base.merge(&overlay);
            let key = cache::encode(url, &params);
            {
                let mut cache = cache::lock(&self.cache);
                if cache.contains(&key) {
                    continue;
                }
                cache.insert(key.clone(), CacheEntry::Loading);
            }

            metrics::counter!(telemetry::PRELOADS_TOTAL, "entity" => self.entity.clone())
                .increment(1);

            let fetcher = Arc::clone(&self.fetcher);
            let cache = Arc::clone(&self.cache);
            let url = url.to_owned();
            let adaptive_skip = self.smart;
            tokio::spawn(async move {
                // Sentinel already placed above; on failure clear it so
                // a later query for this key can fetch.
                if let Err(e) = fetcher.fetch(&url, &params, false, true, adaptive_skip).await {
                    debug!(url = %url, error = %e, "preload fetch failed");
                    cache::lock(&cache).remove(&key);
                }
            });
        }
    }

    /// One full preload cycle: gate, plan, execute.
    pub(crate) fn run(
        &self,
        current: &QueryParams,
        merged: &QueryParams,
        meta: &Map<String, Value>,
        url: &str,
    ) {
        if self.smart {
            let timer = cache::lock(&self.cache).timer().clone();
            if timer.calls > self.min_samples
                && timer.average_ms > self.threshold.as_secs_f64() * 1000.0
            {
                debug!(
                    entity = %self.entity,
                    average_ms = timer.average_ms,
                    calls = timer.calls,
                    "network too slow, skipping preload cycle"
                );
                metrics::counter!(telemetry::PRELOAD_SKIPS_TOTAL, "entity" => self.entity.clone())
                    .increment(1);
                return;
            }
        }

        let predicted = self.plan(current, merged, meta);
        self.execute(predicted, url, merged);
    }
}
