//! Consumer-facing snapshot of a controller's current state.

use serde_json::{Map, Value};

use super::QueryParams;

/// What a UI consumer sees for one entity type at a point in time:
/// the active parameters, the extracted result data for the active
/// query (if resolved), its metadata, and the loading flag.
///
/// A key whose fetch is still in flight yields `data: None` — the
/// loading sentinel never leaks out as final data.
#[derive(Debug, Clone, Default)]
pub struct EntityView {
    pub params: QueryParams,
    pub data: Option<Value>,
    pub meta: Map<String, Value>,
    pub loading: bool,
}
