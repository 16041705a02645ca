//! Core types for the mnemo flashcard applications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ease factor assigned to a card that has never been reviewed.
pub const INITIAL_EASE: f64 = 2.5;

/// Floor below which the ease factor never drops.
pub const MINIMUM_EASE: f64 = 1.3;

/// Rating for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// Get the rating name as a string (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "again" => Some(Self::Again),
            "hard" => Some(Self::Hard),
            "good" => Some(Self::Good),
            "easy" => Some(Self::Easy),
            _ => None,
        }
    }

    /// All ratings in ascending order of recall quality.
    pub fn all() -> [Self; 4] {
        [Self::Again, Self::Hard, Self::Good, Self::Easy]
    }
}

/// Scheduling state of a single card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardState {
    /// Days until the card is due again, measured from the last review.
    pub interval_days: u32,
    /// Consecutive non-failing reviews. Reset to zero on `Again`.
    pub repetition: u32,
    /// Ease multiplier, clamped to [`MINIMUM_EASE`].
    pub ease_factor: f64,
    /// Moment the card becomes due. Always last review time plus interval.
    pub due_date: DateTime<Utc>,
    /// Rating applied at the most recent review. Display only; never feeds
    /// back into scheduling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_rating: Option<Rating>,
    /// Excluded from due selection while set, regardless of `due_date`.
    #[serde(default)]
    pub done: bool,
}

impl CardState {
    /// State of a freshly created card: due immediately, never reviewed.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            interval_days: 0,
            repetition: 0,
            ease_factor: INITIAL_EASE,
            due_date: now,
            last_rating: None,
            done: false,
        }
    }

    /// Whether the card should enter a study queue built at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date <= now && !self.done
    }
}

/// A flashcard with its scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub state: CardState,
}

impl Card {
    /// Create a new card, due immediately.
    pub fn new(front: impl Into<String>, back: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            front: front.into(),
            back: back.into(),
            created_at: now,
            state: CardState::new(now),
        }
    }

    /// Whether the card should enter a study queue built at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.state.is_due(now)
    }
}

/// Deck with card counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub card_count: usize,
    pub due_count: usize,
}

/// A soft-deleted card held in the trash, retaining where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedCard {
    pub card: Card,
    pub origin_deck_id: Uuid,
    pub origin_deck_name: String,
    pub deleted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_card_is_due_immediately() {
        let now = Utc::now();
        let card = Card::new("front", "back", now);
        assert_eq!(card.state.interval_days, 0);
        assert_eq!(card.state.repetition, 0);
        assert_eq!(card.state.ease_factor, INITIAL_EASE);
        assert_eq!(card.state.due_date, now);
        assert_eq!(card.state.last_rating, None);
        assert!(card.is_due(now));
    }

    #[test]
    fn future_card_is_not_due() {
        let now = Utc::now();
        let mut card = Card::new("front", "back", now);
        card.state.due_date = now + Days::new(3);
        assert!(!card.is_due(now));
    }

    #[test]
    fn due_is_inclusive_at_the_boundary() {
        let now = Utc::now();
        let card = Card::new("front", "back", now);
        // due_date == now counts as due
        assert!(card.is_due(now));
    }

    #[test]
    fn done_card_is_never_due() {
        let now = Utc::now();
        let mut card = Card::new("front", "back", now);
        card.state.done = true;
        assert!(!card.is_due(now));
        assert!(!card.is_due(now + Days::new(30)));
    }

    #[test]
    fn rating_string_round_trip() {
        for rating in Rating::all() {
            assert_eq!(Rating::from_str(rating.as_str()), Some(rating));
        }
        assert_eq!(Rating::from_str("medium"), None);
    }

    #[test]
    fn rating_serde_uses_snake_case() {
        let json = serde_json::to_string(&Rating::Again).unwrap();
        assert_eq!(json, "\"again\"");
        let parsed: Rating = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(parsed, Rating::Easy);
    }
}
