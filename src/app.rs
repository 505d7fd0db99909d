use anyhow::{Context, Result};
use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::config::{Config, StoreBackend};
use crate::handlers::{
    create_handler, delete_handler, get_handler, health_handler, list_handler, update_handler,
};
use crate::routes;
use crate::spanner::SpannerKittenStore;
use crate::state::AppState;
use crate::store::{InMemoryKittenStore, KittenStore};

/// Build the one store instance shared by every request.
pub async fn build_store(config: &Config) -> Result<Arc<dyn KittenStore>> {
    match config.store_backend {
        StoreBackend::Spanner => {
            let spanner = config
                .spanner
                .as_ref()
                .context("Spanner settings are required for the spanner store")?;
            let store = SpannerKittenStore::from_config(spanner, &config.kitten_table).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory kitten store; data is lost on restart");
            Ok(Arc::new(InMemoryKittenStore::new()))
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(routes::HEALTH, get(health_handler))
        .route(routes::KITTENS, get(list_handler).post(create_handler))
        .route(
            routes::KITTEN_ITEM,
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
