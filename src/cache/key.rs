//! Cache key derivation.
//!
//! A key is the endpoint URL followed by `key=value` pairs joined by a
//! stable delimiter. [`QueryParams`] iterates in key-sorted order, so
//! the same (url, params) always yields the same key regardless of the
//! order parameters were inserted.

use std::fmt;

use crate::types::QueryParams;

/// A derived cache key. Used as the lookup key into a per-entity-type
/// cache bucket and as the unit of retention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the cache key for a (url, params) pair.
///
/// Pure: no network or state access.
pub fn encode(url: &str, params: &QueryParams) -> CacheKey {
    let mut out = String::from(url);
    for (key, value) in params.iter() {
        out.push('|');
        out.push_str(key);
        out.push('=');
        out.push_str(&value.to_string());
    }
    CacheKey(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_deterministic() {
        let params = QueryParams::new().with("page", 1);
        assert_eq!(encode("/users", &params), encode("/users", &params));
    }

    #[test]
    fn key_is_insertion_order_independent() {
        let forward = QueryParams::new().with("page", 1).with("sort", "name");
        let backward = QueryParams::new().with("sort", "name").with("page", 1);
        assert_eq!(encode("/users", &forward), encode("/users", &backward));
    }

    #[test]
    fn key_differs_on_url() {
        let params = QueryParams::new().with("page", 1);
        assert_ne!(encode("/users", &params), encode("/posts", &params));
    }

    #[test]
    fn key_differs_on_value() {
        let one = QueryParams::new().with("page", 1);
        let two = QueryParams::new().with("page", 2);
        assert_ne!(encode("/users", &one), encode("/users", &two));
    }

    #[test]
    fn empty_params_is_bare_url() {
        assert_eq!(encode("/users", &QueryParams::new()).as_str(), "/users");
    }
}
