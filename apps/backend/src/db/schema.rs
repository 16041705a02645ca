//! SQLite schema definitions.

/// Complete schema for the local SQLite store.
pub const SCHEMA: &str = r#"
-- Decks
CREATE TABLE IF NOT EXISTS decks (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    created_at TEXT NOT NULL
);

-- Cards with their scheduling state
CREATE TABLE IF NOT EXISTS cards (
    id TEXT PRIMARY KEY,
    deck_id TEXT NOT NULL REFERENCES decks(id),
    front TEXT NOT NULL,
    back TEXT NOT NULL,
    created_at TEXT NOT NULL,
    interval_days INTEGER NOT NULL DEFAULT 0,
    repetition INTEGER NOT NULL DEFAULT 0,
    ease_factor REAL NOT NULL DEFAULT 2.5,
    due_date TEXT NOT NULL,
    last_rating TEXT,
    done INTEGER NOT NULL DEFAULT 0
);

-- Soft-deleted cards, keeping where they came from
CREATE TABLE IF NOT EXISTS trash (
    card_id TEXT PRIMARY KEY,
    origin_deck_id TEXT NOT NULL,
    origin_deck_name TEXT NOT NULL,
    deleted_at TEXT NOT NULL,
    front TEXT NOT NULL,
    back TEXT NOT NULL,
    created_at TEXT NOT NULL,
    interval_days INTEGER NOT NULL,
    repetition INTEGER NOT NULL,
    ease_factor REAL NOT NULL,
    due_date TEXT NOT NULL,
    last_rating TEXT,
    done INTEGER NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_cards_deck ON cards(deck_id);
CREATE INDEX IF NOT EXISTS idx_cards_due ON cards(due_date);
CREATE INDEX IF NOT EXISTS idx_trash_deleted ON trash(deleted_at);
"#;
