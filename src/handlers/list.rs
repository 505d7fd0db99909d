use crate::error::ApiError;
use crate::models::Kitten;
use crate::routes;
use crate::state::AppState;
use anyhow::Context;
use axum::{Json, extract::State, http::StatusCode};

/// GET /kittens handler - List every kitten
///
/// Returns the scan result in the order the store yields it. An empty table
/// answers 404 rather than an empty array.
#[utoipa::path(
    get,
    path = routes::KITTENS,
    responses(
        (status = 200, description = "All stored kittens", body = Vec<Kitten>),
        (status = 404, description = "No kittens stored"),
        (status = 500, description = "Storage error")
    ),
    tag = "kittens"
)]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<Kitten>>), ApiError> {
    let kittens = state
        .store
        .scan()
        .await
        .context("Error while listing kittens")?;

    if kittens.is_empty() {
        return Err(ApiError::NotFound(format!(
            "no kittens in table '{}'",
            state.config.kitten_table
        )));
    }

    tracing::info!(table = %state.config.kitten_table, "Listed {} kittens", kittens.len());
    Ok((StatusCode::OK, Json(kittens)))
}
