use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Error type shared by all kitten endpoints
///
/// Every failure is mapped to a bare status code at the handler boundary.
/// The detail is only written to the log, never to the response body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body is not a JSON object
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    /// Path parameter could not be decoded
    #[error("invalid path: {0}")]
    InvalidPath(String),
    /// A required body field is absent
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    /// Nothing stored for the request
    #[error("not found: {0}")]
    NotFound(String),
    /// The storage call failed
    #[error("storage error: {0:#}")]
    StorageError(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) | ApiError::InvalidPath(_) | ApiError::MissingField(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self);
        } else {
            tracing::warn!(status = status.as_u16(), "{}", self);
        }
        status.into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::StorageError(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidBody(err.to_string())
    }
}

/// Unhealthy responses keep a JSON body so health checks can show the cause.
pub fn unhealthy(err: &anyhow::Error) -> (StatusCode, Json<UnhealthyResponse>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(UnhealthyResponse {
            status: "unhealthy".to_string(),
            error: format!("Cannot reach kitten store: {:#}", err),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::InvalidBody("x".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidPath("x".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::MissingField("age").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NotFound("Tom".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::StorageError(anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_response_has_no_body() {
        let response =
            ApiError::StorageError(anyhow!("connection refused").context("Failed to scan"))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn test_storage_error_message_keeps_context_chain() {
        let err = ApiError::from(anyhow!("connection refused").context("Failed to scan"));
        let message = err.to_string();
        assert!(message.contains("Failed to scan"));
        assert!(message.contains("connection refused"));
    }

    #[test]
    fn test_json_error_becomes_invalid_body() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        assert!(matches!(ApiError::from(json_err), ApiError::InvalidBody(_)));
    }
}
