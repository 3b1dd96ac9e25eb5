//! The single decision point for "does this key need a fetch?".
//!
//! Both the direct query path and the preload planner route through
//! [`should_fetch`]; that shared check is what makes the loading
//! sentinel an effective at-most-one-fetch-per-key guard.

use std::time::{Duration, Instant};

use crate::types::CacheEntry;

/// Decide whether a fetch is required for a key.
///
/// - No entry → fetch.
/// - Loading sentinel → no fetch; one is already in flight.
/// - Ready record preloaded less than `preload_window` ago → no fetch.
/// - Anything else → fetch.
pub fn should_fetch(entry: Option<&CacheEntry>, preload_window: Duration, now: Instant) -> bool {
    match entry {
        None => true,
        Some(CacheEntry::Loading) => false,
        Some(CacheEntry::Ready(record)) => match record.preloaded_at {
            Some(preloaded_at) => now.duration_since(preloaded_at) >= preload_window,
            None => true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CacheRecord;
    use serde_json::json;

    fn preloaded_record(at: Instant) -> CacheEntry {
        CacheEntry::Ready(CacheRecord {
            data: json!([]),
            meta: Default::default(),
            preloaded_at: Some(at),
        })
    }

    #[test]
    fn absent_entry_fetches() {
        assert!(should_fetch(None, Duration::from_secs(10), Instant::now()));
    }

    #[test]
    fn loading_sentinel_never_fetches() {
        assert!(!should_fetch(
            Some(&CacheEntry::Loading),
            Duration::from_secs(10),
            Instant::now()
        ));
    }

    #[test]
    fn fresh_preload_skips_fetch() {
        let t0 = Instant::now();
        let entry = preloaded_record(t0);
        let window = Duration::from_millis(10_000);

        assert!(!should_fetch(Some(&entry), window, t0 + Duration::from_millis(9_999)));
    }

    #[test]
    fn expired_preload_fetches() {
        let t0 = Instant::now();
        let entry = preloaded_record(t0);
        let window = Duration::from_millis(10_000);

        assert!(should_fetch(Some(&entry), window, t0 + window));
        assert!(should_fetch(Some(&entry), window, t0 + Duration::from_secs(60)));
    }

    #[test]
    fn direct_record_always_refetches() {
        let entry = CacheEntry::Ready(CacheRecord {
            data: json!([]),
            meta: Default::default(),
            preloaded_at: None,
        });
        assert!(should_fetch(Some(&entry), Duration::from_secs(10), Instant::now()));
    }
}
