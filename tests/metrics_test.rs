//! Metrics emission tests using the debugging recorder.

use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};

use huginn::{CacheEntry, CacheRecord, EntityCache, QueryParams, encode};
use serde_json::json;

fn counter_value(snapshotter: &Snapshotter, name: &str) -> u64 {
    snapshotter
        .snapshot()
        .into_vec()
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter && key.key().name() == name
        })
        .map(|(_, _, _, val)| match val {
            DebugValue::Counter(c) => *c,
            _ => 0,
        })
        .sum()
}

fn ready() -> CacheEntry {
    CacheEntry::Ready(CacheRecord {
        data: json!([]),
        meta: Default::default(),
        preloaded_at: None,
    })
}

#[test]
fn evictions_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let mut cache = EntityCache::new("users");
        for n in 0..4i64 {
            let key = encode("/users", &QueryParams::new().with("page", n));
            cache.insert(key.clone(), ready());
            cache.retain(&key, 2);
        }
    });

    // Four pushes with limit 2 evict the two oldest keys.
    assert_eq!(counter_value(&snapshotter, "huginn_evictions_total"), 2);
}

#[test]
fn retained_pushes_emit_no_evictions() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let mut cache = EntityCache::new("users");
        for n in 0..2i64 {
            let key = encode("/users", &QueryParams::new().with("page", n));
            cache.insert(key.clone(), ready());
            cache.retain(&key, 10);
        }
    });

    assert_eq!(counter_value(&snapshotter, "huginn_evictions_total"), 0);
}
