//! API route definitions

use crate::handlers::{health, users};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create the user similarity routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/users/",
            post(users::create_user).get(users::list_users),
        )
        .route("/users/find-similar/", post(users::find_similar_user))
        .route("/users/:user_id", get(users::get_user))
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
}
