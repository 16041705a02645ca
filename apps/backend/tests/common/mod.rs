//! Common test utilities for integration tests.
//!
//! Tests run against an in-memory SQLite store, so no external services
//! are needed. The generator is wired without an API key; generation
//! endpoints fail deterministically instead of calling out.

pub mod fixtures;

use axum::Router;
use chrono::{Days, Utc};
use uuid::Uuid;

use mnemo_backend::db::{CardRepository, DeckRepository, SqliteStore};
use mnemo_backend::models::{Card, Deck};
use mnemo_backend::services::CardGenerator;
use mnemo_backend::{build_router, AppState};

/// Test context wrapping the shared application state.
pub struct TestContext {
    state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        let store = SqliteStore::open_in_memory().expect("open in-memory store");
        let state = AppState::new(store, CardGenerator::new(None));
        Self { state }
    }

    /// Router over this context's state, for use with axum-test.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Create a deck directly in the store.
    pub fn create_deck(&self, name: &str) -> Deck {
        let store = self.state.store.lock().expect("store lock");
        store
            .create_deck(name, None, Utc::now())
            .expect("create deck")
    }

    /// Append a card that is due immediately.
    pub fn add_card(&self, deck_id: Uuid, front: &str, back: &str) -> Card {
        let card = Card::new(front, back, Utc::now());
        let store = self.state.store.lock().expect("store lock");
        store.append_card(deck_id, &card).expect("append card");
        card
    }

    /// Append a card that only becomes due `days` from now.
    pub fn add_card_due_in(&self, deck_id: Uuid, front: &str, back: &str, days: u64) -> Card {
        let now = Utc::now();
        let mut card = Card::new(front, back, now);
        card.state.due_date = now + Days::new(days);
        let store = self.state.store.lock().expect("store lock");
        store.append_card(deck_id, &card).expect("append card");
        card
    }

    /// Read a card back from the store.
    pub fn get_card(&self, deck_id: Uuid, card_id: Uuid) -> Option<Card> {
        let store = self.state.store.lock().expect("store lock");
        store.get_card(deck_id, card_id).expect("get card")
    }
}
