use crate::error::ApiError;
use crate::models::CreateKittenRequest;
use crate::routes;
use crate::state::AppState;
use anyhow::Context;
use axum::{body::Bytes, extract::State, http::StatusCode};

/// POST /kittens handler - Create or overwrite a kitten
///
/// The body is read as raw bytes and validated before any storage call. An
/// existing kitten with the same name is overwritten without a check.
#[utoipa::path(
    post,
    path = routes::KITTENS,
    request_body = CreateKittenRequest,
    responses(
        (status = 201, description = "Kitten stored"),
        (status = 400, description = "Body is not a JSON object, or name/age is missing"),
        (status = 500, description = "Storage error")
    ),
    tag = "kittens"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let kitten = CreateKittenRequest::from_body(&body)?.into_kitten();
    let name = kitten.name.clone();

    state
        .store
        .put(kitten)
        .await
        .with_context(|| format!("Error while putting kitten '{}'", name))?;

    tracing::info!(table = %state.config.kitten_table, "Created kitten: {}", name);
    Ok(StatusCode::CREATED)
}
