//! Per-entity-type lifecycle controller.
//!
//! [`EntityController`] is the top-level surface: it owns the active
//! query state for one entity type and composes the key encoder,
//! freshness evaluator, fetch orchestrator, preload planner, and
//! retention queue into the operations a UI consumer calls —
//! `initial_query`, `query`, the four mutations, `set_preloader`,
//! and a [`snapshot`](EntityController::snapshot) view.
//!
//! # Failure semantics
//!
//! A failed direct query is recovered locally: the loading flag
//! clears, the active params roll back to the value captured at call
//! start (one level — stacked failures recover only the immediately
//! prior state), the unfreeze hook fires, and the call still returns
//! `Ok`. Mutation failures propagate to the caller with the freeze
//! hook left engaged. Operations that need an endpoint before
//! `initial_query` has set one return [`HuginnError::Setup`] before
//! any network activity.

mod hooks;
mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use tracing::warn;

use crate::cache::{self, EntityCache, SharedCache, freshness};
use crate::fetch::Fetcher;
use crate::preload::{PreloadPlanner, PreloadPredictor};
use crate::store::{DeleteTarget, EntityStore};
use crate::types::{CacheEntry, EntityView, QueryParams};
use crate::{HuginnError, Result, telemetry};

pub use hooks::{NoopHooks, UiHooks};
pub use state::QueryState;

/// Configuration for one entity-type registration.
///
/// All knobs are optional with defaults:
///
/// ```rust
/// # use huginn::EntityConfig;
/// # use std::time::Duration;
/// let config = EntityConfig::new()
///     .retain(25)
///     .smart_preload(true)
///     .preload_threshold(Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct EntityConfig {
    /// Response field extracted as result data, with the remaining
    /// fields kept as metadata. `None` disables the split and the whole
    /// payload becomes data. Default: `Some("data")`.
    pub result_field: Option<String>,
    /// Skip the freeze hook when the active key already has cached
    /// data. Default: true.
    pub hide_loading_if_cached: bool,
    /// Maximum cache records retained per entity type. Default: 10.
    pub retain: usize,
    /// Cache bucket name override. Default: pluralized entity name.
    pub bucket: Option<String>,
    /// How long a preloaded record counts as fresh. Default: 10 s.
    pub preload_window: Duration,
    /// Gate preloading on measured network latency. Default: false.
    pub smart_preload: bool,
    /// Mean latency above which smart mode skips a preload cycle.
    /// Default: 300 ms.
    pub preload_threshold: Duration,
    /// Recorded calls required before the latency mean is trusted.
    /// Default: 3.
    pub preload_min_samples: u64,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            result_field: Some("data".to_owned()),
            hide_loading_if_cached: true,
            retain: 10,
            bucket: None,
            preload_window: Duration::from_secs(10),
            smart_preload: false,
            preload_threshold: Duration::from_millis(300),
            preload_min_samples: 3,
        }
    }
}

impl EntityConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extracted result field.
    pub fn result_field(mut self, field: impl Into<String>) -> Self {
        self.result_field = Some(field.into());
        self
    }

    /// Treat the whole response payload as data, with no metadata split.
    pub fn whole_payload(mut self) -> Self {
        self.result_field = None;
        self
    }

    /// Control whether cached data suppresses the freeze hook.
    pub fn hide_loading_if_cached(mut self, hide: bool) -> Self {
        self.hide_loading_if_cached = hide;
        self
    }

    /// Set the retention limit.
    pub fn retain(mut self, limit: usize) -> Self {
        self.retain = limit;
        self
    }

    /// Override the cache bucket name.
    pub fn bucket(mut self, name: impl Into<String>) -> Self {
        self.bucket = Some(name.into());
        self
    }

    /// Set the preload validity window.
    pub fn preload_window(mut self, window: Duration) -> Self {
        self.preload_window = window;
        self
    }

    /// Enable or disable the adaptive preload gate.
    pub fn smart_preload(mut self, enabled: bool) -> Self {
        self.smart_preload = enabled;
        self
    }

    /// Set the latency threshold for the adaptive gate.
    pub fn preload_threshold(mut self, threshold: Duration) -> Self {
        self.preload_threshold = threshold;
        self
    }

    /// Set how many latency samples the gate requires before acting.
    pub fn preload_min_samples(mut self, samples: u64) -> Self {
        self.preload_min_samples = samples;
        self
    }
}

/// Builder for [`EntityController`] instances.
pub struct EntityControllerBuilder {
    entity: String,
    store: Option<Arc<dyn EntityStore>>,
    hooks: Arc<dyn UiHooks>,
    cache: Option<SharedCache>,
    config: EntityConfig,
}

impl EntityControllerBuilder {
    fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            store: None,
            hooks: Arc::new(NoopHooks),
            cache: None,
            config: EntityConfig::default(),
        }
    }

    /// Set the entity store (required).
    pub fn store(mut self, store: Arc<dyn EntityStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the UI hooks. Defaults to no-ops.
    pub fn hooks(mut self, hooks: Arc<dyn UiHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Supply an existing cache aggregate instead of a fresh one, e.g.
    /// to share a bucket between controllers or to inspect it in tests.
    pub fn cache(mut self, cache: SharedCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the entity configuration.
    pub fn config(mut self, config: EntityConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the controller.
    pub fn build(self) -> Result<EntityController> {
        let store = self
            .store
            .ok_or_else(|| HuginnError::Configuration("no entity store configured".to_owned()))?;

        let bucket = self
            .config
            .bucket
            .clone()
            .unwrap_or_else(|| format!("{}s", self.entity));
        let cache = self.cache.unwrap_or_else(|| EntityCache::shared(bucket));

        let fetcher = Arc::new(Fetcher::new(
            self.entity.clone(),
            Arc::clone(&store),
            Arc::clone(&cache),
            self.config.retain,
            self.config.result_field.clone(),
        ));
        let planner = PreloadPlanner::new(
            self.entity.clone(),
            Arc::clone(&fetcher),
            Arc::clone(&cache),
            self.config.smart_preload,
            self.config.preload_threshold,
            self.config.preload_min_samples,
        );

        Ok(EntityController {
            entity: self.entity,
            config: self.config,
            store,
            hooks: self.hooks,
            cache,
            fetcher,
            planner,
            state: Mutex::new(QueryState::default()),
        })
    }
}

enum Mutation {
    Create,
    Update,
    Patch,
    Delete,
}

impl Mutation {
    fn name(&self) -> &'static str {
        match self {
            Mutation::Create => "create",
            Mutation::Update => "update",
            Mutation::Patch => "patch",
            Mutation::Delete => "delete",
        }
    }
}

/// Lifecycle controller for one entity type.
pub struct EntityController {
    entity: String,
    config: EntityConfig,
    store: Arc<dyn EntityStore>,
    hooks: Arc<dyn UiHooks>,
    cache: SharedCache,
    fetcher: Arc<Fetcher>,
    planner: PreloadPlanner,
    state: Mutex<QueryState>,
}

impl EntityController {
    /// Start building a controller for the given entity type.
    pub fn builder(entity: impl Into<String>) -> EntityControllerBuilder {
        EntityControllerBuilder::new(entity)
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Register the prediction function used by the preload planner.
    pub fn set_preloader<F>(&self, predictor: F)
    where
        F: Fn(&QueryParams, &QueryParams, &Map<String, Value>) -> Vec<QueryParams>
            + Send
            + Sync
            + 'static,
    {
        let predictor: Arc<PreloadPredictor> = Arc::new(predictor);
        self.planner.set_predictor(predictor);
    }

    /// A clone of the current query state.
    pub fn state(&self) -> QueryState {
        self.state_lock().clone()
    }

    /// The view contract handed to the UI consumer: active params,
    /// extracted data for the active key (if resolved), metadata, and
    /// the loading flag.
    pub fn snapshot(&self) -> EntityView {
        let state = self.state_lock().clone();
        let (data, meta) = match &state.url {
            Some(url) => {
                let key = cache::encode(url, &state.params);
                match cache::lock(&self.cache).get(&key) {
                    Some(CacheEntry::Ready(record)) => {
                        (Some(record.data.clone()), record.meta.clone())
                    }
                    _ => (None, Map::new()),
                }
            }
            None => (None, Map::new()),
        };

        EntityView {
            params: state.params,
            data,
            meta,
            loading: state.loading,
        }
    }

    /// Establish the active endpoint and run the first query.
    ///
    /// The supplied params are taken as the full initial set, not as an
    /// overlay on anything previous.
    pub async fn initial_query(&self, url: impl Into<String>, params: QueryParams) -> Result<()> {
        {
            let mut state = self.state_lock();
            *state = state.with_url(url);
        }
        self.run_query(params, true).await
    }

    /// Query with parameters overlaid on the active set.
    pub async fn query(&self, params: QueryParams) -> Result<()> {
        self.run_query(params, false).await
    }

    /// Create an entity, then refresh the active query.
    pub async fn create(&self, entity: Value) -> Result<()> {
        self.mutate(Mutation::Create, entity).await
    }

    /// Replace an entity, then refresh the active query.
    pub async fn update(&self, entity: Value) -> Result<()> {
        self.mutate(Mutation::Update, entity).await
    }

    /// Partially update an entity, then refresh the active query.
    pub async fn patch(&self, entity: Value) -> Result<()> {
        self.mutate(Mutation::Patch, entity).await
    }

    /// Delete an entity by id or by object, then refresh the active
    /// query.
    pub async fn delete(&self, target: impl Into<DeleteTarget>) -> Result<()> {
        self.mutate(Mutation::Delete, target.into().into_entity())
            .await
    }

    fn state_lock(&self) -> MutexGuard<'_, QueryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run_query(&self, params: QueryParams, initial: bool) -> Result<()> {
        let (url, old_params, merged) = {
            let mut state = self.state_lock();
            let url = state
                .url
                .clone()
                .ok_or(HuginnError::Setup("query"))?;
            let old_params = state.params.clone();
            let next = if initial {
                state.with_params(params)
            } else {
                state.with_merged(&params)
            };
            *state = next.with_loading(true);
            (url, old_params, state.params.clone())
        };

        let key = cache::encode(&url, &merged);
        let (entry, meta) = {
            let cache = cache::lock(&self.cache);
            let entry = cache.get(&key).cloned();
            let meta = entry
                .as_ref()
                .and_then(CacheEntry::record)
                .map(|r| r.meta.clone())
                .unwrap_or_default();
            (entry, meta)
        };

        let has_cached = matches!(entry, Some(CacheEntry::Ready(_)));
        if has_cached {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "entity" => self.entity.clone())
                .increment(1);
        } else {
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "entity" => self.entity.clone())
                .increment(1);
        }

        if !has_cached || !self.config.hide_loading_if_cached {
            self.hooks.freeze();
        }

        self.planner.run(&old_params, &merged, &meta, &url);

        if freshness::should_fetch(entry.as_ref(), self.config.preload_window, Instant::now()) {
            if let Err(e) = self.fetcher.fetch(&url, &merged, true, false, false).await {
                warn!(entity = %self.entity, url = %url, error = %e, "query fetch failed, rolling back params");
                {
                    let mut state = self.state_lock();
                    *state = state.with_params(old_params).with_loading(false);
                }
                self.hooks.unfreeze();
                return Ok(());
            }
        }

        {
            let mut state = self.state_lock();
            *state = state.with_loading(false);
        }
        self.hooks.unfreeze();
        Ok(())
    }

    async fn mutate(&self, op: Mutation, entity: Value) -> Result<()> {
        let url = {
            self.state_lock()
                .url
                .clone()
                .ok_or(HuginnError::Setup(op.name()))?
        };

        self.hooks.freeze();
        match op {
            Mutation::Create => self.store.create(&url, &entity).await?,
            Mutation::Update => self.store.update(&url, &entity).await?,
            Mutation::Patch => self.store.patch(&url, &entity).await?,
            Mutation::Delete => self.store.delete(&url, &entity).await?,
        };

        // Refresh the view with the currently active params. They are
        // already the full active set, so no overlay merge is needed.
        let params = { self.state_lock().params.clone() };
        self.run_query(params, true).await?;
        self.hooks.unfreeze();
        Ok(())
    }
}
