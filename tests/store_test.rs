//! Tests for [`HttpEntityStore`] against a mock HTTP server.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use huginn::{EntityController, EntityStore, HttpEntityStore, HuginnError, QueryParams};

#[tokio::test]
async fn fetch_sends_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "1"))
        .and(query_param("sort", "name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "1"}],
            "total": 1,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpEntityStore::new(server.uri()).unwrap();
    let params = QueryParams::new().with("page", 1).with("sort", "name");
    let payload = store.fetch("/users", &params, false).await.unwrap();

    assert_eq!(payload["total"], json!(1));
}

#[tokio::test]
async fn error_status_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let store = HttpEntityStore::new(server.uri()).unwrap();
    let err = store
        .fetch("/users", &QueryParams::new(), false)
        .await
        .unwrap_err();

    match err {
        HuginnError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "unavailable");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn create_posts_json_body() {
    let server = MockServer::start().await;
    let entity = json!({"name": "mina"});
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(&entity))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "9"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpEntityStore::new(server.uri()).unwrap();
    let created = store.create("/users", &entity).await.unwrap();

    assert_eq!(created["id"], json!("9"));
}

#[tokio::test]
async fn update_and_patch_use_put_and_patch() {
    let server = MockServer::start().await;
    let entity = json!({"id": "9", "name": "mina"});
    Mock::given(method("PUT"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpEntityStore::new(server.uri()).unwrap();
    store.update("/users", &entity).await.unwrap();
    store.patch("/users", &entity).await.unwrap();
}

#[tokio::test]
async fn delete_sends_entity_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users"))
        .and(body_json(json!({"id": "42"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpEntityStore::new(server.uri()).unwrap();
    store.delete("/users", &json!({"id": "42"})).await.unwrap();
}

// =========================================================================
// Controller over a real HTTP round trip
// =========================================================================

#[tokio::test]
async fn controller_end_to_end_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "1", "name": "mina"}],
            "total": 1,
            "page": 1,
        })))
        .mount(&server)
        .await;

    let store = Arc::new(HttpEntityStore::new(server.uri()).unwrap());
    let users = EntityController::builder("user")
        .store(store)
        .build()
        .unwrap();

    users
        .initial_query("/users", QueryParams::new().with("page", 1))
        .await
        .unwrap();

    let view = users.snapshot();
    assert_eq!(view.data, Some(json!([{"id": "1", "name": "mina"}])));
    assert_eq!(view.meta.get("total"), Some(&json!(1)));
    assert!(!view.loading);
}
