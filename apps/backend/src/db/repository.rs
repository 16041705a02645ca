//! Repository pattern for store access.

use crate::db::error::StoreError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use srs_core::types::{Card, CardState, Deck, DeletedCard, Rating};
use std::path::Path;
use uuid::Uuid;

type Result<T> = std::result::Result<T, StoreError>;

/// Deck that receives restored cards when their origin deck is gone.
pub const RESTORED_DECK_NAME: &str = "Restored Cards";

const DEMO_DECK_NAME: &str = "Getting Started";

const DEMO_CARDS: &[(&str, &str)] = &[
    (
        "What is spaced repetition?",
        "Reviewing material at growing intervals, shortly before you would forget it.",
    ),
    (
        "When does a card come back after you rate it Good?",
        "In five days.",
    ),
    (
        "What happens when you rate a card Again?",
        "Its progress resets and it is due for review right away.",
    ),
    (
        "How do you retire a card you already know?",
        "Mark it done during a study session. Editing the card brings it back.",
    ),
];

/// Repository for deck operations.
pub trait DeckRepository {
    fn list_decks(&self, now: DateTime<Utc>) -> Result<Vec<Deck>>;
    fn get_deck(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<Deck>>;
    fn create_deck(
        &self,
        name: &str,
        description: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Deck>;
    fn update_deck(&self, id: Uuid, name: &str, description: Option<&str>) -> Result<bool>;
    fn delete_deck(&self, id: Uuid) -> Result<bool>;
}

/// Repository for card operations.
pub trait CardRepository {
    fn cards_for_deck(&self, deck_id: Uuid) -> Result<Vec<Card>>;
    fn get_card(&self, deck_id: Uuid, card_id: Uuid) -> Result<Option<Card>>;
    fn append_card(&self, deck_id: Uuid, card: &Card) -> Result<()>;
    fn update_card(&self, card: &Card) -> Result<bool>;
}

/// A card put back from the trash, with the deck that received it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RestoredCard {
    pub deck_id: Uuid,
    pub deck_name: String,
    pub card: Card,
}

/// Repository for trash operations.
pub trait TrashRepository {
    fn move_to_trash(
        &self,
        deck_id: Uuid,
        card_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<DeletedCard>>;
    fn list_trash(&self) -> Result<Vec<DeletedCard>>;
    fn restore_card(&self, card_id: Uuid, now: DateTime<Utc>) -> Result<Option<RestoredCard>>;
    fn purge_card(&self, card_id: Uuid) -> Result<bool>;
}

/// SQLite implementation of the repositories.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open store at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        Ok(())
    }

    /// Insert a small starter deck the first time the store is used.
    ///
    /// Returns the deck when it was created, `None` when the store already
    /// holds decks.
    pub fn seed_demo_deck(&self, now: DateTime<Utc>) -> Result<Option<Deck>> {
        let deck_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM decks", [], |row| row.get(0))?;
        if deck_count > 0 {
            return Ok(None);
        }

        let deck = self.create_deck(
            DEMO_DECK_NAME,
            Some("A short deck that shows how studying works."),
            now,
        )?;
        for (front, back) in DEMO_CARDS {
            self.append_card(deck.id, &Card::new(*front, *back, now))?;
        }
        self.get_deck(deck.id, now)
    }

    fn row_to_card(row: &rusqlite::Row) -> rusqlite::Result<Card> {
        Ok(Card {
            id: parse_uuid(row, 0)?,
            front: row.get(1)?,
            back: row.get(2)?,
            created_at: parse_datetime(row, 3)?,
            state: CardState {
                interval_days: row.get(4)?,
                repetition: row.get(5)?,
                ease_factor: row.get(6)?,
                due_date: parse_datetime(row, 7)?,
                last_rating: row
                    .get::<_, Option<String>>(8)?
                    .and_then(|s| Rating::from_str(&s)),
                done: row.get(9)?,
            },
        })
    }

    fn row_to_deck(row: &rusqlite::Row) -> rusqlite::Result<Deck> {
        Ok(Deck {
            id: parse_uuid(row, 0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            created_at: parse_datetime(row, 3)?,
            card_count: row.get(4)?,
            due_count: row.get(5)?,
        })
    }

    fn row_to_deleted_card(row: &rusqlite::Row) -> rusqlite::Result<DeletedCard> {
        Ok(DeletedCard {
            card: Card {
                id: parse_uuid(row, 0)?,
                front: row.get(4)?,
                back: row.get(5)?,
                created_at: parse_datetime(row, 6)?,
                state: CardState {
                    interval_days: row.get(7)?,
                    repetition: row.get(8)?,
                    ease_factor: row.get(9)?,
                    due_date: parse_datetime(row, 10)?,
                    last_rating: row
                        .get::<_, Option<String>>(11)?
                        .and_then(|s| Rating::from_str(&s)),
                    done: row.get(12)?,
                },
            },
            origin_deck_id: parse_uuid(row, 1)?,
            origin_deck_name: row.get(2)?,
            deleted_at: parse_datetime(row, 3)?,
        })
    }

    fn deck_name(&self, id: Uuid) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT name FROM decks WHERE id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    fn deck_id_by_name(&self, name: &str) -> Result<Option<Uuid>> {
        let id: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM decks WHERE name = ?1 ORDER BY rowid LIMIT 1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        match id {
            Some(s) => Uuid::parse_str(&s)
                .map(Some)
                .map_err(|e| StoreError::InvalidData(format!("deck id {s}: {e}"))),
            None => Ok(None),
        }
    }
}

impl DeckRepository for SqliteStore {
    fn list_decks(&self, now: DateTime<Utc>) -> Result<Vec<Deck>> {
        let mut stmt = self.conn.prepare(
            "SELECT d.id, d.name, d.description, d.created_at,
                COUNT(c.id) AS card_count,
                COALESCE(SUM(CASE WHEN c.done = 0 AND c.due_date <= ?1 THEN 1 ELSE 0 END), 0) AS due_count
            FROM decks d
            LEFT JOIN cards c ON c.deck_id = d.id
            GROUP BY d.id
            ORDER BY d.rowid",
        )?;

        let decks = stmt
            .query_map(params![now.to_rfc3339()], Self::row_to_deck)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(decks)
    }

    fn get_deck(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<Deck>> {
        self.conn
            .query_row(
                "SELECT d.id, d.name, d.description, d.created_at,
                    COUNT(c.id) AS card_count,
                    COALESCE(SUM(CASE WHEN c.done = 0 AND c.due_date <= ?1 THEN 1 ELSE 0 END), 0) AS due_count
                FROM decks d
                LEFT JOIN cards c ON c.deck_id = d.id
                WHERE d.id = ?2
                GROUP BY d.id",
                params![now.to_rfc3339(), id.to_string()],
                Self::row_to_deck,
            )
            .optional()
            .map_err(Into::into)
    }

    fn create_deck(
        &self,
        name: &str,
        description: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Deck> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO decks (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![id.to_string(), name, description, now.to_rfc3339()],
        )?;
        Ok(Deck {
            id,
            name: name.to_string(),
            description: description.map(String::from),
            created_at: now,
            card_count: 0,
            due_count: 0,
        })
    }

    fn update_deck(&self, id: Uuid, name: &str, description: Option<&str>) -> Result<bool> {
        let count = self.conn.execute(
            "UPDATE decks SET name = ?1, description = ?2 WHERE id = ?3",
            params![name, description, id.to_string()],
        )?;
        Ok(count > 0)
    }

    fn delete_deck(&self, id: Uuid) -> Result<bool> {
        // Trash entries keep their origin metadata, so they survive this.
        self.conn.execute(
            "DELETE FROM cards WHERE deck_id = ?1",
            params![id.to_string()],
        )?;
        let count = self.conn.execute(
            "DELETE FROM decks WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(count > 0)
    }
}

impl CardRepository for SqliteStore {
    fn cards_for_deck(&self, deck_id: Uuid) -> Result<Vec<Card>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, front, back, created_at, interval_days, repetition, ease_factor, due_date, last_rating, done
            FROM cards WHERE deck_id = ?1
            ORDER BY rowid",
        )?;

        let cards = stmt
            .query_map(params![deck_id.to_string()], Self::row_to_card)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(cards)
    }

    fn get_card(&self, deck_id: Uuid, card_id: Uuid) -> Result<Option<Card>> {
        self.conn
            .query_row(
                "SELECT id, front, back, created_at, interval_days, repetition, ease_factor, due_date, last_rating, done
                FROM cards WHERE deck_id = ?1 AND id = ?2",
                params![deck_id.to_string(), card_id.to_string()],
                Self::row_to_card,
            )
            .optional()
            .map_err(Into::into)
    }

    fn append_card(&self, deck_id: Uuid, card: &Card) -> Result<()> {
        self.conn.execute(
            "INSERT INTO cards (id, deck_id, front, back, created_at, interval_days, repetition, ease_factor, due_date, last_rating, done)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                card.id.to_string(),
                deck_id.to_string(),
                card.front,
                card.back,
                card.created_at.to_rfc3339(),
                card.state.interval_days,
                card.state.repetition,
                card.state.ease_factor,
                card.state.due_date.to_rfc3339(),
                card.state.last_rating.map(|r| r.as_str()),
                card.state.done,
            ],
        )?;
        Ok(())
    }

    fn update_card(&self, card: &Card) -> Result<bool> {
        let count = self.conn.execute(
            "UPDATE cards SET front = ?1, back = ?2, interval_days = ?3, repetition = ?4, ease_factor = ?5, due_date = ?6, last_rating = ?7, done = ?8
            WHERE id = ?9",
            params![
                card.front,
                card.back,
                card.state.interval_days,
                card.state.repetition,
                card.state.ease_factor,
                card.state.due_date.to_rfc3339(),
                card.state.last_rating.map(|r| r.as_str()),
                card.state.done,
                card.id.to_string(),
            ],
        )?;
        Ok(count > 0)
    }
}

impl TrashRepository for SqliteStore {
    fn move_to_trash(
        &self,
        deck_id: Uuid,
        card_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<DeletedCard>> {
        let Some(deck_name) = self.deck_name(deck_id)? else {
            return Ok(None);
        };
        let Some(card) = self.get_card(deck_id, card_id)? else {
            return Ok(None);
        };

        self.conn.execute(
            "INSERT INTO trash (card_id, origin_deck_id, origin_deck_name, deleted_at, front, back, created_at, interval_days, repetition, ease_factor, due_date, last_rating, done)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                card.id.to_string(),
                deck_id.to_string(),
                deck_name,
                now.to_rfc3339(),
                card.front,
                card.back,
                card.created_at.to_rfc3339(),
                card.state.interval_days,
                card.state.repetition,
                card.state.ease_factor,
                card.state.due_date.to_rfc3339(),
                card.state.last_rating.map(|r| r.as_str()),
                card.state.done,
            ],
        )?;
        self.conn.execute(
            "DELETE FROM cards WHERE id = ?1",
            params![card.id.to_string()],
        )?;

        Ok(Some(DeletedCard {
            card,
            origin_deck_id: deck_id,
            origin_deck_name: deck_name,
            deleted_at: now,
        }))
    }

    fn list_trash(&self) -> Result<Vec<DeletedCard>> {
        let mut stmt = self.conn.prepare(
            "SELECT card_id, origin_deck_id, origin_deck_name, deleted_at, front, back, created_at, interval_days, repetition, ease_factor, due_date, last_rating, done
            FROM trash
            ORDER BY deleted_at DESC, rowid DESC",
        )?;

        let cards = stmt
            .query_map([], Self::row_to_deleted_card)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(cards)
    }

    fn restore_card(&self, card_id: Uuid, now: DateTime<Utc>) -> Result<Option<RestoredCard>> {
        let entry = self
            .conn
            .query_row(
                "SELECT card_id, origin_deck_id, origin_deck_name, deleted_at, front, back, created_at, interval_days, repetition, ease_factor, due_date, last_rating, done
                FROM trash WHERE card_id = ?1",
                params![card_id.to_string()],
                Self::row_to_deleted_card,
            )
            .optional()?;
        let Some(entry) = entry else {
            return Ok(None);
        };

        // Put the card back where it came from; if that deck is gone,
        // collect it in a dedicated deck instead.
        let (deck_id, deck_name) = match self.deck_name(entry.origin_deck_id)? {
            Some(name) => (entry.origin_deck_id, name),
            None => match self.deck_id_by_name(RESTORED_DECK_NAME)? {
                Some(id) => (id, RESTORED_DECK_NAME.to_string()),
                None => {
                    let deck = self.create_deck(
                        RESTORED_DECK_NAME,
                        Some("Cards restored from the trash."),
                        now,
                    )?;
                    (deck.id, deck.name)
                }
            },
        };

        self.append_card(deck_id, &entry.card)?;
        self.conn.execute(
            "DELETE FROM trash WHERE card_id = ?1",
            params![card_id.to_string()],
        )?;

        Ok(Some(RestoredCard {
            deck_id,
            deck_name,
            card: entry.card,
        }))
    }

    fn purge_card(&self, card_id: Uuid) -> Result<bool> {
        let count = self.conn.execute(
            "DELETE FROM trash WHERE card_id = ?1",
            params![card_id.to_string()],
        )?;
        Ok(count > 0)
    }
}

fn parse_uuid(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Uuid> {
    let s: String = row.get(idx)?;
    Uuid::parse_str(&s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_datetime(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}
