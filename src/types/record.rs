//! Cache entry and record types.

use std::time::Instant;

use serde_json::{Map, Value};

/// One slot in a cache bucket.
///
/// `Loading` marks a fetch in flight so concurrent callers don't issue
/// a duplicate request for the same key. It is never surfaced to a
/// consumer as final data — the freshness evaluator treats it as
/// "do not refetch, not yet usable".
#[derive(Debug, Clone)]
pub enum CacheEntry {
    Loading,
    Ready(CacheRecord),
}

impl CacheEntry {
    pub fn is_loading(&self) -> bool {
        matches!(self, CacheEntry::Loading)
    }

    /// The ready record, if this entry has resolved.
    pub fn record(&self) -> Option<&CacheRecord> {
        match self {
            CacheEntry::Ready(record) => Some(record),
            CacheEntry::Loading => None,
        }
    }
}

/// A resolved cache record for one query.
#[derive(Debug, Clone)]
pub struct CacheRecord {
    /// The extracted result payload (or the whole response when no
    /// result field is configured).
    pub data: Value,
    /// Remaining top-level response fields when a result field was
    /// extracted; empty otherwise.
    pub meta: Map<String, Value>,
    /// Set when this record was populated by a speculative preload
    /// rather than a direct query.
    pub preloaded_at: Option<Instant>,
}

impl CacheRecord {
    /// Build a record from a raw response payload.
    ///
    /// When `result_field` is set and the payload is an object carrying
    /// that field, the field becomes `data` and the rest of the object
    /// becomes `meta`. Otherwise the whole payload is `data`.
    pub fn from_response(
        payload: Value,
        result_field: Option<&str>,
        preloaded_at: Option<Instant>,
    ) -> Self {
        match (result_field, payload) {
            (Some(field), Value::Object(mut map)) if map.contains_key(field) => {
                let data = map.remove(field).unwrap_or(Value::Null);
                Self {
                    data,
                    meta: map,
                    preloaded_at,
                }
            }
            (_, payload) => Self {
                data: payload,
                meta: Map::new(),
                preloaded_at,
            },
        }
    }
}
