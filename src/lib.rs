//! Huginn - client-side entity query caching and speculative preloading
//!
//! This crate sits between a UI consumer and a networked entity store.
//! Given an entity type and a set of query parameters it decides when
//! to issue a network fetch, when to serve cached results, when to
//! speculatively preload predicted future queries, and when to evict
//! old cache entries under a bounded retention policy.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use huginn::{EntityConfig, EntityController, HttpEntityStore, QueryParams};
//!
//! #[tokio::main]
//! async fn main() -> huginn::Result<()> {
//!     let store = Arc::new(HttpEntityStore::new("https://api.example.com")?);
//!
//!     let users = EntityController::builder("user")
//!         .store(store)
//!         .config(EntityConfig::new().retain(25))
//!         .build()?;
//!
//!     // Preload the next page whenever a page resolves.
//!     users.set_preloader(|_current, merged, _meta| {
//!         match merged.get("page") {
//!             Some(huginn::ParamValue::Int(page)) => {
//!                 vec![QueryParams::new().with("page", page + 1)]
//!             }
//!             _ => Vec::new(),
//!         }
//!     });
//!
//!     users
//!         .initial_query("/users", QueryParams::new().with("page", 1))
//!         .await?;
//!
//!     let view = users.snapshot();
//!     println!("{:?}", view.data);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod controller;
pub mod error;
mod fetch;
pub mod preload;
pub mod store;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheKey, EntityCache, NetworkTimer, SharedCache, encode, should_fetch};
pub use controller::{
    EntityConfig, EntityController, EntityControllerBuilder, NoopHooks, QueryState, UiHooks,
};
pub use error::{HuginnError, Result};
pub use preload::PreloadPredictor;
pub use store::{DeleteTarget, EntityStore, http::HttpEntityStore};
pub use types::{CacheEntry, CacheRecord, EntityView, ParamValue, QueryParams};
