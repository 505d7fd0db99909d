use crate::error::ApiError;
use crate::extract::KittenName;
use crate::models::Kitten;
use crate::routes;
use crate::state::AppState;
use anyhow::Context;
use axum::{Json, extract::State, http::StatusCode};

/// GET /kittens/{name} handler - Fetch one kitten
#[utoipa::path(
    get,
    path = routes::KITTEN_ITEM,
    params(
        ("name" = String, Path, description = "Name of the kitten")
    ),
    responses(
        (status = 200, description = "Kitten found", body = Kitten),
        (status = 404, description = "No kitten with this name"),
        (status = 500, description = "Storage error")
    ),
    tag = "kittens"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    KittenName(name): KittenName,
) -> Result<(StatusCode, Json<Kitten>), ApiError> {
    let found = state
        .store
        .get(&name)
        .await
        .with_context(|| format!("Error while getting kitten '{}'", name))?;

    match found {
        Some(kitten) => {
            tracing::info!("Retrieved kitten: {}", name);
            Ok((StatusCode::OK, Json(kitten)))
        }
        None => Err(ApiError::NotFound(format!("kitten '{}'", name))),
    }
}
