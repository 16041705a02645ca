//! Factory functions for request bodies.

use serde_json::json;
use uuid::Uuid;

/// Create a deck request body.
pub fn create_deck_request(name: &str) -> serde_json::Value {
    json!({ "name": name })
}

/// Create a deck request body with a description.
pub fn create_deck_request_with_description(name: &str, description: &str) -> serde_json::Value {
    json!({ "name": name, "description": description })
}

/// Update a deck request body.
pub fn update_deck_request(name: &str, description: Option<&str>) -> serde_json::Value {
    json!({ "name": name, "description": description })
}

/// Create a card request body.
pub fn create_card_request(front: &str, back: &str) -> serde_json::Value {
    json!({ "front": front, "back": back })
}

/// Update a card request body.
pub fn update_card_request(front: &str, back: &str, done: Option<bool>) -> serde_json::Value {
    match done {
        Some(done) => json!({ "front": front, "back": back, "done": done }),
        None => json!({ "front": front, "back": back }),
    }
}

/// Start a study session request body.
pub fn start_session_request(deck_id: Uuid) -> serde_json::Value {
    json!({ "deck_id": deck_id })
}

/// Rate the presented card request body.
pub fn rate_request(rating: &str) -> serde_json::Value {
    json!({ "rating": rating })
}

/// Generate-from-topic request body.
pub fn generate_topic_request(topic: &str, count: u32) -> serde_json::Value {
    json!({ "mode": "topic", "topic": topic, "count": count })
}

/// Generate-from-words request body.
pub fn generate_words_request(words: &[&str]) -> serde_json::Value {
    json!({ "mode": "words", "words": words })
}
