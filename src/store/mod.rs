//! Interface to the networked entity store.
//!
//! The controller and orchestrator talk to the store exclusively
//! through [`EntityStore`], so transports other than HTTP (gRPC, a
//! test double, an in-process store) drop in without touching the
//! caching logic. [`HttpEntityStore`] is the default implementation.

pub mod http;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::Result;
use crate::types::QueryParams;

/// Abstract entity store: one query operation plus the four mutations.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Query entities at `url` with the given parameters.
    ///
    /// `adaptive_skip` is forwarded from the preload planner for
    /// transport-level budget short-circuiting; implementations may
    /// ignore it.
    async fn fetch(&self, url: &str, params: &QueryParams, adaptive_skip: bool) -> Result<Value>;

    async fn create(&self, url: &str, entity: &Value) -> Result<Value>;

    async fn update(&self, url: &str, entity: &Value) -> Result<Value>;

    async fn patch(&self, url: &str, entity: &Value) -> Result<Value>;

    async fn delete(&self, url: &str, entity: &Value) -> Result<Value>;
}

/// Target of a delete operation: either a bare identifier or a full
/// entity object carrying one. Normalized to object form before
/// dispatch.
#[derive(Debug, Clone)]
pub enum DeleteTarget {
    Id(String),
    Entity(Value),
}

impl DeleteTarget {
    /// Normalize to the object form the store expects.
    pub fn into_entity(self) -> Value {
        match self {
            DeleteTarget::Id(id) => json!({ "id": id }),
            DeleteTarget::Entity(entity) => entity,
        }
    }
}

impl From<&str> for DeleteTarget {
    fn from(id: &str) -> Self {
        DeleteTarget::Id(id.to_owned())
    }
}

impl From<String> for DeleteTarget {
    fn from(id: String) -> Self {
        DeleteTarget::Id(id)
    }
}

impl From<Value> for DeleteTarget {
    fn from(entity: Value) -> Self {
        DeleteTarget::Entity(entity)
    }
}
