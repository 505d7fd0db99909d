use crate::app::build_router;
use crate::config::{Config, StoreBackend};
use crate::models::Kitten;
use crate::state::AppState;
use crate::store::{InMemoryKittenStore, KittenStore};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::{Router, body::Body, body::Bytes, http::Request, http::StatusCode};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tower::ServiceExt;

/// Store whose every call fails, to exercise the 500 path.
pub struct FailingStore;

#[async_trait]
impl KittenStore for FailingStore {
    async fn put(&self, _kitten: Kitten) -> Result<()> {
        Err(anyhow!("storage unavailable"))
    }

    async fn scan(&self) -> Result<Vec<Kitten>> {
        Err(anyhow!("storage unavailable"))
    }

    async fn get(&self, _name: &str) -> Result<Option<Kitten>> {
        Err(anyhow!("storage unavailable"))
    }

    async fn update_age(&self, _name: &str, _age: JsonValue) -> Result<()> {
        Err(anyhow!("storage unavailable"))
    }

    async fn delete(&self, _name: &str) -> Result<()> {
        Err(anyhow!("storage unavailable"))
    }

    async fn health_check(&self) -> Result<()> {
        Err(anyhow!("storage unavailable"))
    }
}

pub fn test_config() -> Config {
    Config {
        kitten_table: "kittens".to_string(),
        store_backend: StoreBackend::Memory,
        spanner: None,
        service_port: 3000,
        service_host: "0.0.0.0".to_string(),
    }
}

pub fn setup_test_app(store: Arc<dyn KittenStore>) -> Router {
    build_router(AppState {
        store,
        config: Arc::new(test_config()),
    })
}

/// App over a fresh in-memory store, plus a handle to inspect that store.
pub fn memory_app() -> (Router, Arc<InMemoryKittenStore>) {
    let store = Arc::new(InMemoryKittenStore::new());
    (setup_test_app(store.clone()), store)
}

pub fn failing_app() -> Router {
    setup_test_app(Arc::new(FailingStore))
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Bytes) {
    let body = body.map(|body| body.as_bytes().to_vec());
    send_bytes(app, method, uri, body).await
}

/// Like `send`, but with arbitrary body bytes, which need not be UTF-8.
pub async fn send_bytes(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Vec<u8>>,
) -> (StatusCode, Bytes) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body)
}
