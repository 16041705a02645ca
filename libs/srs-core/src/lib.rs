//! Core spaced-repetition library shared by the mnemo applications.
//!
//! Provides:
//! - Fixed-bucket SM-2 scheduling (interval, repetition, ease factor)
//! - Study session sequencer over a frozen queue of due cards
//! - Shared types (Card, CardState, Deck, Rating, etc.)

pub mod scheduler;
pub mod session;
pub mod types;

pub use scheduler::Scheduler;
pub use session::{SessionError, SessionPhase, StudySession};
pub use types::{Card, CardState, Deck, DeletedCard, Rating, INITIAL_EASE, MINIMUM_EASE};
