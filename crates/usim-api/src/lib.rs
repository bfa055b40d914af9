//! Usim API - REST server
//!
//! Exposes the user similarity endpoints over HTTP and wires the
//! embedding client and vector store into shared application state.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

#[cfg(feature = "test-utils")]
pub mod testing;

use axum::http::HeaderValue;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document for the service
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::users::create_user,
        handlers::users::find_similar_user,
        handlers::users::get_user,
        handlers::users::list_users,
        handlers::health::health_check,
    ),
    components(schemas(
        usim_core::UserProfile,
        handlers::users::UserResponse,
        handlers::health::HealthResponse,
        error::ErrorBody,
    )),
    tags(
        (name = "users", description = "User profile similarity endpoints"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Build the full application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .merge(routes::api_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
