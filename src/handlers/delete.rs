use crate::error::ApiError;
use crate::extract::KittenName;
use crate::routes;
use crate::state::AppState;
use anyhow::Context;
use axum::{extract::State, http::StatusCode};

/// DELETE /kittens/{name} handler - Remove a kitten
///
/// Deleting a name that is not stored still answers 200.
#[utoipa::path(
    delete,
    path = routes::KITTEN_ITEM,
    params(
        ("name" = String, Path, description = "Name of the kitten")
    ),
    responses(
        (status = 200, description = "Kitten removed, or was never stored"),
        (status = 500, description = "Storage error")
    ),
    tag = "kittens"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    KittenName(name): KittenName,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete(&name)
        .await
        .with_context(|| format!("Error while deleting kitten '{}'", name))?;

    tracing::info!("Deleted kitten: {}", name);
    Ok(StatusCode::OK)
}
