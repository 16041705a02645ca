//! AI generation endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::db::{CardRepository, DeckRepository};
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::generate::{DEFAULT_CARD_COUNT, MAX_CARD_COUNT};
use crate::AppState;

/// POST /api/decks/:id/generate
pub async fn generate_cards(
    State(state): State<AppState>,
    Path(deck_id): Path<Uuid>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    match &payload.source {
        GenerateSource::Topic { topic } if topic.trim().is_empty() => {
            return Err(ApiError::BadRequest("Topic must not be empty".to_string()));
        }
        GenerateSource::Text { text } if text.trim().is_empty() => {
            return Err(ApiError::BadRequest("Text must not be empty".to_string()));
        }
        GenerateSource::Words { words } if words.is_empty() => {
            return Err(ApiError::BadRequest("Word list must not be empty".to_string()));
        }
        _ => {}
    }

    {
        let store = state.store.lock().expect("store lock");
        store
            .get_deck(deck_id, Utc::now())?
            .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;
    }

    let count = payload
        .count
        .unwrap_or(DEFAULT_CARD_COUNT)
        .clamp(1, MAX_CARD_COUNT);
    let instructions = payload.instructions.as_deref();

    // No locks held while the model call is in flight.
    let generated = match &payload.source {
        GenerateSource::Topic { topic } => {
            state.generator.from_topic(topic, count, instructions).await?
        }
        GenerateSource::Text { text } => {
            state.generator.from_text(text, count, instructions).await?
        }
        GenerateSource::Words { words } => {
            state.generator.from_words(words, instructions).await?
        }
    };

    let now = Utc::now();
    let store = state.store.lock().expect("store lock");
    let mut cards = Vec::with_capacity(generated.len());
    for item in generated {
        let card = Card::new(item.front, item.back, now);
        store.append_card(deck_id, &card)?;
        cards.push(card);
    }
    Ok(Json(GenerateResponse { cards }))
}
