use utoipa::OpenApi;

use crate::error::{HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{CreateKittenRequest, Kitten, UpdateKittenRequest};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "rust-spanner-kittens API",
        version = "1.0.0",
        description = "CRUD endpoints for kitten records backed by Google Cloud Spanner"
    ),
    paths(
        handlers::health::health_handler,
        handlers::create::create_handler,
        handlers::list::list_handler,
        handlers::get::get_handler,
        handlers::update::update_handler,
        handlers::delete::delete_handler
    ),
    components(
        schemas(
            Kitten,
            CreateKittenRequest,
            UpdateKittenRequest,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "kittens", description = "Kitten record operations")
    )
)]
pub struct ApiDoc;
