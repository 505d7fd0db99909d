use crate::error::ApiError;
use crate::extract::KittenName;
use crate::models::UpdateKittenRequest;
use crate::routes;
use crate::state::AppState;
use anyhow::Context;
use axum::{body::Bytes, extract::State, http::StatusCode};

/// PUT /kittens/{name} handler - Set a kitten's age
///
/// Only `age` is read from the body; the name comes from the path. Updating
/// a name that is not stored is answered the same as updating one that is.
#[utoipa::path(
    put,
    path = routes::KITTEN_ITEM,
    params(
        ("name" = String, Path, description = "Name of the kitten")
    ),
    request_body = UpdateKittenRequest,
    responses(
        (status = 200, description = "Age updated"),
        (status = 400, description = "Body is not a JSON object, or age is missing"),
        (status = 500, description = "Storage error")
    ),
    tag = "kittens"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    KittenName(name): KittenName,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let request = UpdateKittenRequest::from_body(&body)?;

    state
        .store
        .update_age(&name, request.age)
        .await
        .with_context(|| format!("Error while updating kitten '{}'", name))?;

    tracing::info!("Updated kitten: {}", name);
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{failing_app, memory_app, send, send_bytes};
    use crate::models::Kitten;
    use crate::store::KittenStore;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_update_endpoint_persists_age() {
        let (app, _store) = memory_app();

        send(&app, "POST", "/kittens", Some(r#"{"name":"Tom","age":3}"#)).await;

        let (status, body) = send(&app, "PUT", "/kittens/Tom", Some(r#"{"age":4}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());

        let (status, body) = send(&app, "GET", "/kittens/Tom", None).await;
        assert_eq!(status, StatusCode::OK);
        let kitten: Kitten = serde_json::from_slice(&body).unwrap();
        assert_eq!(kitten.age, json!(4));
    }

    #[tokio::test]
    async fn test_update_endpoint_ignores_body_name() {
        let (app, store) = memory_app();

        send(&app, "POST", "/kittens", Some(r#"{"name":"Tom","age":3}"#)).await;
        send(&app, "PUT", "/kittens/Tom", Some(r#"{"name":"Felix","age":5}"#)).await;

        assert_eq!(store.get("Tom").await.unwrap().unwrap().age, json!(5));
        assert_eq!(store.get("Felix").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_endpoint_missing_age_leaves_record() {
        let (app, store) = memory_app();

        send(&app, "POST", "/kittens", Some(r#"{"name":"Tom","age":3}"#)).await;

        let (status, _) = send(&app, "PUT", "/kittens/Tom", Some(r#"{"name":"Tom"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(store.get("Tom").await.unwrap().unwrap().age, json!(3));
    }

    #[tokio::test]
    async fn test_update_endpoint_invalid_json_skips_storage() {
        let app = failing_app();

        for body in ["{invalid json}", "", "42"] {
            let (status, _) = send(&app, "PUT", "/kittens/Tom", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", body);
        }
    }

    #[tokio::test]
    async fn test_update_endpoint_unknown_name_is_not_distinguished() {
        let (app, _store) = memory_app();

        let (status, _) = send(&app, "PUT", "/kittens/Ghost", Some(r#"{"age":1}"#)).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_endpoint_non_utf8_body() {
        let app = failing_app();

        let (status, body) =
            send_bytes(&app, "PUT", "/kittens/Tom", Some(vec![b'{', 0xff, b'}'])).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_update_endpoint_bad_path_encoding() {
        let app = failing_app();

        let (status, body) = send(&app, "PUT", "/kittens/%FF", Some(r#"{"age":4}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_update_endpoint_storage_error() {
        let app = failing_app();

        let (status, _) = send(&app, "PUT", "/kittens/Tom", Some(r#"{"age":4}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
