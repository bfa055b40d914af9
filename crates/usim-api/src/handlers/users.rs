//! User profile handlers
//!
//! The four operations share one shape: validate the payload, turn the
//! profile into text, embed it, then hit the vector store.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use usim_core::UserProfile;
use utoipa::ToSchema;
use uuid::Uuid;

/// Response body for a stored profile
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Identifier assigned at creation
    pub id: Uuid,

    /// The stored profile
    pub user: UserProfile,

    /// Cosine similarity to the query; only set by find-similar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f32>,
}

/// Store a new user profile with its embedding
#[utoipa::path(
    post,
    path = "/users/",
    tag = "users",
    request_body = UserProfile,
    responses(
        (status = 200, description = "Profile stored", body = UserResponse),
        (status = 500, description = "Embedding generation failed", body = crate::error::ErrorBody)
    )
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(user): Json<UserProfile>,
) -> Result<impl IntoResponse, ApiError> {
    state.increment_requests();

    let embedding = state.embedder.embed(&user.embedding_text()).await?;
    let id = Uuid::new_v4();

    state.store.upsert(id, embedding, &user).await?;
    tracing::info!(%id, "stored user profile");

    Ok((
        StatusCode::OK,
        Json(UserResponse {
            id,
            user,
            similarity_score: None,
        }),
    ))
}

/// Find the most similar stored profile
#[utoipa::path(
    post,
    path = "/users/find-similar/",
    tag = "users",
    request_body = UserProfile,
    responses(
        (status = 200, description = "Closest profile", body = UserResponse),
        (status = 404, description = "No profiles stored", body = crate::error::ErrorBody),
        (status = 500, description = "Embedding generation failed", body = crate::error::ErrorBody)
    )
)]
pub async fn find_similar_user(
    State(state): State<Arc<AppState>>,
    Json(user): Json<UserProfile>,
) -> Result<Json<UserResponse>, ApiError> {
    state.increment_requests();

    let embedding = state.embedder.embed(&user.embedding_text()).await?;

    let nearest = state
        .store
        .find_nearest(embedding)
        .await?
        .ok_or_else(|| ApiError::NotFound("No similar users found".to_string()))?;

    Ok(Json(UserResponse {
        id: nearest.id,
        user: nearest.profile,
        similarity_score: Some(nearest.score),
    }))
}

/// Get a stored profile by id
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = Uuid, Path, description = "Identifier returned at creation")
    ),
    responses(
        (status = 200, description = "Stored profile", body = UserResponse),
        (status = 404, description = "Unknown id", body = crate::error::ErrorBody)
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    state.increment_requests();

    let stored = state
        .store
        .retrieve(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse {
        id: stored.id,
        user: stored.profile,
        similarity_score: None,
    }))
}

/// List stored profiles, capped at 100
#[utoipa::path(
    get,
    path = "/users/",
    tag = "users",
    responses(
        (status = 200, description = "Stored profiles", body = [UserResponse])
    )
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    state.increment_requests();

    let profiles = state.store.list().await?;

    Ok(Json(
        profiles
            .into_iter()
            .map(|stored| UserResponse {
                id: stored.id,
                user: stored.profile,
                similarity_score: None,
            })
            .collect(),
    ))
}
