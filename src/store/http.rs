//! HTTP implementation of the entity store.
//!
//! Queries go out as GET with a query string; mutations as
//! POST/PUT/PATCH/DELETE with JSON bodies. Constructed with a base URL
//! so a mock server can stand in during tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::EntityStore;
use crate::types::QueryParams;
use crate::{HuginnError, Result};

/// Entity store backed by a JSON-over-HTTP API.
#[derive(Clone)]
pub struct HttpEntityStore {
    http: Client,
    base_url: String,
}

impl HttpEntityStore {
    /// Create a store rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| HuginnError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self, url: &str) -> String {
        format!("{}{}", self.base_url, url)
    }

    async fn into_value(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(HuginnError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| HuginnError::Http(e.to_string()))
    }
}

#[async_trait]
impl EntityStore for HttpEntityStore {
    async fn fetch(&self, url: &str, params: &QueryParams, _adaptive_skip: bool) -> Result<Value> {
        let response = self
            .http
            .get(self.endpoint(url))
            .query(&params.to_pairs())
            .send()
            .await
            .map_err(|e| HuginnError::Http(e.to_string()))?;

        Self::into_value(response).await
    }

    async fn create(&self, url: &str, entity: &Value) -> Result<Value> {
        let response = self
            .http
            .post(self.endpoint(url))
            .json(entity)
            .send()
            .await
            .map_err(|e| HuginnError::Http(e.to_string()))?;

        Self::into_value(response).await
    }

    async fn update(&self, url: &str, entity: &Value) -> Result<Value> {
        let response = self
            .http
            .put(self.endpoint(url))
            .json(entity)
            .send()
            .await
            .map_err(|e| HuginnError::Http(e.to_string()))?;

        Self::into_value(response).await
    }

    async fn patch(&self, url: &str, entity: &Value) -> Result<Value> {
        let response = self
            .http
            .patch(self.endpoint(url))
            .json(entity)
            .send()
            .await
            .map_err(|e| HuginnError::Http(e.to_string()))?;

        Self::into_value(response).await
    }

    async fn delete(&self, url: &str, entity: &Value) -> Result<Value> {
        let response = self
            .http
            .delete(self.endpoint(url))
            .json(entity)
            .send()
            .await
            .map_err(|e| HuginnError::Http(e.to_string()))?;

        Self::into_value(response).await
    }
}
