use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::ApiError;

/// The `{name}` path segment of a kitten route.
///
/// Rejections go through `ApiError`, so a bad segment gets a bare 400 like
/// every other client error.
pub struct KittenName(pub String);

impl<S> FromRequestParts<S> for KittenName
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(name) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::InvalidPath(rejection.body_text()))?;
        Ok(Self(name))
    }
}
