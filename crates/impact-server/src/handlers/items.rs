//! `/api/items` CRUD.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use impact_core::{Item, NewItem};
use tracing::{info, instrument};

use super::{MessageResponse, invalidate_document};
use crate::error::AppError;
use crate::state::AppState;
use crate::store::new_id;

pub const ITEMS_PATH: &str = "/api/items";

#[instrument(skip_all)]
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, AppError> {
    Ok(Json(state.items().find_all().await?))
}

#[instrument(skip_all)]
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    let Json(payload) = payload?;
    let item = payload.into_item(new_id(), Utc::now())?;
    let item = state.items().insert(item).await?;

    invalidate_document(state.cache(), ITEMS_PATH, &item.id).await;
    info!(id = %item.id, "Item created");

    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>, AppError> {
    state
        .items()
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Item '{}' not found", id)))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    let Json(payload) = payload?;
    let existing = state
        .items()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item '{}' not found", id)))?;

    let updated = payload.apply_to(&existing, Utc::now())?;
    let updated = state.items().replace(updated).await?;

    invalidate_document(state.cache(), ITEMS_PATH, &id).await;
    Ok(Json(updated))
}

#[instrument(skip_all, fields(id = %id))]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .items()
        .delete(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item '{}' not found", id)))?;

    invalidate_document(state.cache(), ITEMS_PATH, &id).await;
    Ok(Json(MessageResponse::new("Item deleted.")))
}
