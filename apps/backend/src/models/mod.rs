//! API request and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export shared types from srs-core
pub use srs_core::session::{SessionPhase, StudySession};
pub use srs_core::types::{Card, CardState, Deck, DeletedCard, Rating};

// === Deck types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckListResponse {
    pub decks: Vec<Deck>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDeckRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateDeckRequest {
    pub name: String,
    pub description: Option<String>,
}

/// A deck together with its cards, as returned by the detail endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeckDetail {
    pub deck: Deck,
    pub cards: Vec<Card>,
}

// === Card types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCardRequest {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCardRequest {
    pub front: String,
    pub back: String,
    /// Clearing the flag puts the card back into future study queues.
    pub done: Option<bool>,
}

// === Trash types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct TrashListResponse {
    pub cards: Vec<DeletedCard>,
}

// === Generation types ===

/// Source material for AI card generation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GenerateSource {
    /// Free-form topic, e.g. "the French Revolution".
    Topic { topic: String },
    /// A passage to extract cards from. Long texts are truncated.
    Text { text: String },
    /// Vocabulary list; one card per word.
    Words { words: Vec<String> },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub source: GenerateSource,
    pub count: Option<u32>,
    pub instructions: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub cards: Vec<Card>,
}

// === Study types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub deck_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RateRequest {
    pub rating: Rating,
}

/// Client-facing projection of a study session.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub deck_id: Uuid,
    pub phase: SessionPhase,
    pub total: usize,
    pub position: usize,
    pub revealed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardFace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previews: Option<Vec<RatingPreview>>,
}

/// The presented card. The back stays hidden until revealed.
#[derive(Debug, Serialize, Deserialize)]
pub struct CardFace {
    pub id: Uuid,
    pub front: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
}

/// Dry-run scheduling outcome shown on a rating control.
#[derive(Debug, Serialize, Deserialize)]
pub struct RatingPreview {
    pub rating: Rating,
    pub label: String,
}

impl SessionView {
    /// Project a session for the API, previewing each rating's outcome
    /// against the presented card without mutating anything.
    pub fn project(
        session_id: Uuid,
        deck_id: Uuid,
        session: &StudySession,
        now: DateTime<Utc>,
    ) -> Self {
        let card = session.current().map(|card| CardFace {
            id: card.id,
            front: card.front.clone(),
            back: session.is_revealed().then(|| card.back.clone()),
        });
        let previews = session.current().map(|card| {
            Rating::all()
                .into_iter()
                .map(|rating| {
                    let next = session.scheduler().next_state(&card.state, rating, now);
                    RatingPreview {
                        rating,
                        label: interval_label(next.interval_days),
                    }
                })
                .collect()
        });
        Self {
            session_id,
            deck_id,
            phase: session.phase(),
            total: session.total(),
            position: session.position(),
            revealed: session.is_revealed(),
            card,
            previews,
        }
    }
}

/// Label for a preview interval: "Now" for same-day, otherwise days.
fn interval_label(interval_days: u32) -> String {
    if interval_days == 0 {
        "Now".to_string()
    } else {
        format!("{interval_days}d")
    }
}
