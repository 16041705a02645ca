//! Local SQLite store.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::StoreError;
pub use repository::{
    CardRepository, DeckRepository, RestoredCard, SqliteStore, TrashRepository,
    RESTORED_DECK_NAME,
};
