//! Query parameter mapping.
//!
//! [`QueryParams`] is a string-keyed map of scalar values representing
//! filters, pagination, and sort for an entity query. Parameters merge
//! additively: a new query's parameters overlay the previously active
//! set (shallow merge). Storage is a `BTreeMap`, so iteration is always
//! key-sorted regardless of insertion order — the key encoder relies on
//! this for order-stable cache keys.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::String(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{n}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Int(n.into())
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Float(x)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

/// A set of query parameters for one entity query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams(BTreeMap<String, ParamValue>);

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, consuming and returning self for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a parameter in place, overwriting any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a parameter by key.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Shallow additive merge: `overlay` values win over existing ones.
    ///
    /// Pure — returns a new set, leaving both inputs untouched.
    pub fn merge(&self, overlay: &QueryParams) -> QueryParams {
        let mut merged = self.0.clone();
        for (k, v) in &overlay.0 {
            merged.insert(k.clone(), v.clone());
        }
        QueryParams(merged)
    }

    /// Iterate parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render as `(key, value)` string pairs for a URL query string.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ParamValue)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        QueryParams(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overlays_new_values() {
        let base = QueryParams::new().with("page", 1).with("sort", "name");
        let overlay = QueryParams::new().with("page", 2);

        let merged = base.merge(&overlay);
        assert_eq!(merged.get("page"), Some(&ParamValue::Int(2)));
        assert_eq!(merged.get("sort"), Some(&ParamValue::String("name".into())));
    }

    #[test]
    fn merge_is_pure() {
        let base = QueryParams::new().with("page", 1);
        let overlay = QueryParams::new().with("page", 2);

        let _ = base.merge(&overlay);
        assert_eq!(base.get("page"), Some(&ParamValue::Int(1)));
    }

    #[test]
    fn pairs_are_key_sorted() {
        let params = QueryParams::new().with("z", 1).with("a", 2);
        let pairs = params.to_pairs();
        assert_eq!(pairs[0].0, "a");
        assert_eq!(pairs[1].0, "z");
    }
}
