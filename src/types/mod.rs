//! Core data types shared across the crate.

pub mod params;
pub mod record;
pub mod view;

pub use params::{ParamValue, QueryParams};
pub use record::{CacheEntry, CacheRecord};
pub use view::EntityView;
