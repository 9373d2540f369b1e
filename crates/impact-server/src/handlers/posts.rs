//! `/api/social-media-posts` CRUD.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use impact_core::{NewPost, Post};
use tracing::{info, instrument};

use super::{MessageResponse, invalidate_document};
use crate::error::AppError;
use crate::state::AppState;
use crate::store::new_id;

pub const POSTS_PATH: &str = "/api/social-media-posts";

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Social media post '{}' not found", id))
}

#[instrument(skip_all)]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.posts().find_all().await?))
}

#[instrument(skip_all)]
pub async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<NewPost>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let Json(payload) = payload?;
    let post = payload.into_post(new_id(), Utc::now())?;
    let post = state.posts().insert(post).await?;

    invalidate_document(state.cache(), POSTS_PATH, &post.id).await;
    info!(id = %post.id, topic = %post.topic, "Social media post created");

    Ok((StatusCode::CREATED, Json(post)))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, AppError> {
    state
        .posts()
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

/// Reemplaza todos los campos editables del post.
#[instrument(skip_all, fields(id = %id))]
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NewPost>, JsonRejection>,
) -> Result<Json<Post>, AppError> {
    let Json(payload) = payload?;
    let existing = state
        .posts()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    let updated = payload.apply_to(&existing, Utc::now())?;
    let updated = state.posts().replace(updated).await?;

    invalidate_document(state.cache(), POSTS_PATH, &id).await;
    Ok(Json(updated))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .posts()
        .delete(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    invalidate_document(state.cache(), POSTS_PATH, &id).await;
    Ok(Json(MessageResponse::new("Social media post deleted.")))
}
