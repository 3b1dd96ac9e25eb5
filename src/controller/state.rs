//! Controller query state.
//!
//! The active url, params, and loading flag are modeled as one record
//! with pure transition methods, so the rollback and merge semantics
//! unit-test without a controller or a network.

use crate::types::QueryParams;

/// The active query state of one controller instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    pub url: Option<String>,
    pub params: QueryParams,
    pub loading: bool,
}

impl QueryState {
    /// Set the active endpoint.
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..self.clone()
        }
    }

    /// Replace the active parameter set wholesale.
    pub fn with_params(&self, params: QueryParams) -> Self {
        Self {
            params,
            ..self.clone()
        }
    }

    /// Overlay new parameters onto the active set (additive merge).
    pub fn with_merged(&self, overlay: &QueryParams) -> Self {
        self.with_params(self.params.merge(overlay))
    }

    pub fn with_loading(&self, loading: bool) -> Self {
        Self {
            loading,
            ..self.clone()
        }
    }
}
