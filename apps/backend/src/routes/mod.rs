//! HTTP route handlers.

pub mod decks;
pub mod generate;
pub mod study;
pub mod trash;
