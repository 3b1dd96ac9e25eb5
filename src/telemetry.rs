//! Telemetry metric name constants.
//!
//! Centralised metric names for huginn operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `huginn_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `entity` — entity type name (e.g. "user")
//! - `bucket` — cache bucket name (e.g. "users")
//! - `preload` — whether the fetch was speculative: "true" | "false"
//! - `status` — outcome: "ok" or "error"

/// Total fetches dispatched through the orchestrator.
///
/// Labels: `entity`, `preload` ("true" | "false"), `status` ("ok" | "error").
pub const FETCHES_TOTAL: &str = "huginn_fetches_total";

/// Total cache lookups that found a ready record.
///
/// Labels: `entity`.
pub const CACHE_HITS_TOTAL: &str = "huginn_cache_hits_total";

/// Total cache lookups that found nothing usable.
///
/// Labels: `entity`.
pub const CACHE_MISSES_TOTAL: &str = "huginn_cache_misses_total";

/// Total records evicted by the retention queue.
///
/// Labels: `bucket`.
pub const EVICTIONS_TOTAL: &str = "huginn_evictions_total";

/// Total speculative fetches issued by the preload planner.
///
/// Labels: `entity`.
pub const PRELOADS_TOTAL: &str = "huginn_preloads_total";

/// Total preload cycles skipped by the adaptive latency gate.
///
/// Labels: `entity`.
pub const PRELOAD_SKIPS_TOTAL: &str = "huginn_preload_skips_total";
