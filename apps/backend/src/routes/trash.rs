//! Trash endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::db::{RestoredCard, TrashRepository};
use crate::error::{ApiError, Result};
use crate::models::TrashListResponse;
use crate::AppState;

/// GET /api/trash
pub async fn list(State(state): State<AppState>) -> Result<Json<TrashListResponse>> {
    let store = state.store.lock().expect("store lock");
    let cards = store.list_trash()?;
    Ok(Json(TrashListResponse { cards }))
}

/// POST /api/trash/:card_id/restore
pub async fn restore(
    State(state): State<AppState>,
    Path(card_id): Path<Uuid>,
) -> Result<Json<RestoredCard>> {
    let store = state.store.lock().expect("store lock");
    let restored = store
        .restore_card(card_id, Utc::now())?
        .ok_or_else(|| ApiError::NotFound("Card not found in trash".to_string()))?;
    Ok(Json(restored))
}

/// DELETE /api/trash/:card_id
pub async fn purge(
    State(state): State<AppState>,
    Path(card_id): Path<Uuid>,
) -> Result<StatusCode> {
    let store = state.store.lock().expect("store lock");
    if !store.purge_card(card_id)? {
        return Err(ApiError::NotFound("Card not found in trash".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
