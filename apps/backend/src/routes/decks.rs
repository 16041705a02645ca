//! Deck and card endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::db::{CardRepository, DeckRepository, TrashRepository};
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// GET /api/decks
pub async fn list(State(state): State<AppState>) -> Result<Json<DeckListResponse>> {
    let store = state.store.lock().expect("store lock");
    let decks = store.list_decks(Utc::now())?;
    Ok(Json(DeckListResponse { decks }))
}

/// POST /api/decks
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateDeckRequest>,
) -> Result<Json<Deck>> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Deck name must not be empty".to_string()));
    }

    let store = state.store.lock().expect("store lock");
    let deck = store.create_deck(name, payload.description.as_deref(), Utc::now())?;
    Ok(Json(deck))
}

/// GET /api/decks/:id
pub async fn detail(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<DeckDetail>> {
    let store = state.store.lock().expect("store lock");
    let deck = store
        .get_deck(deck_id, Utc::now())?
        .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;
    let cards = store.cards_for_deck(deck_id)?;
    Ok(Json(DeckDetail { deck, cards }))
}

/// PUT /api/decks/:id
pub async fn update(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
    Json(payload): Json<UpdateDeckRequest>,
) -> Result<Json<Deck>> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Deck name must not be empty".to_string()));
    }

    let now = Utc::now();
    let store = state.store.lock().expect("store lock");
    if !store.update_deck(deck_id, name, payload.description.as_deref())? {
        return Err(ApiError::NotFound("Deck not found".to_string()));
    }
    let deck = store
        .get_deck(deck_id, now)?
        .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;
    Ok(Json(deck))
}

/// DELETE /api/decks/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
) -> Result<StatusCode> {
    let store = state.store.lock().expect("store lock");
    if !store.delete_deck(deck_id)? {
        return Err(ApiError::NotFound("Deck not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/decks/:id/cards
pub async fn add_card(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
    Json(payload): Json<CreateCardRequest>,
) -> Result<Json<Card>> {
    if payload.front.trim().is_empty() || payload.back.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Card front and back must not be empty".to_string(),
        ));
    }

    let now = Utc::now();
    let store = state.store.lock().expect("store lock");
    store
        .get_deck(deck_id, now)?
        .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;

    let card = Card::new(payload.front.trim(), payload.back.trim(), now);
    store.append_card(deck_id, &card)?;
    Ok(Json(card))
}

/// PUT /api/decks/:id/cards/:card_id
pub async fn edit_card(
    State(state): State<AppState>,
    Path((deck_id, card_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateCardRequest>,
) -> Result<Json<Card>> {
    if payload.front.trim().is_empty() || payload.back.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Card front and back must not be empty".to_string(),
        ));
    }

    let store = state.store.lock().expect("store lock");
    let mut card = store
        .get_card(deck_id, card_id)?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    card.front = payload.front.trim().to_string();
    card.back = payload.back.trim().to_string();
    if let Some(done) = payload.done {
        card.state.done = done;
    }

    store.update_card(&card)?;
    Ok(Json(card))
}

/// DELETE /api/decks/:id/cards/:card_id
pub async fn delete_card(
    State(state): State<AppState>,
    Path((deck_id, card_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DeletedCard>> {
    let store = state.store.lock().expect("store lock");
    let deleted = store
        .move_to_trash(deck_id, card_id, Utc::now())?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;
    Ok(Json(deleted))
}
