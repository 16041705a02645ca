//! Study session sequencer.
//!
//! A session snapshots the due subset of a deck once, shuffles it, and
//! walks it with a cursor. The queue is frozen: card updates made while
//! the session runs (including the ones the session itself emits) never
//! re-filter or re-order it, so progress counters stay stable.

use crate::scheduler::Scheduler;
use crate::types::{Card, Rating};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Rating, skipping or revealing was attempted with no card presented.
    #[error("session has no active card")]
    NoActiveCard,
}

/// Phase of a study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Cards remain; `current` presents one.
    Active,
    /// Every queued card was rated or marked done.
    Finished,
    /// No cards were due when the session began.
    Empty,
}

/// A single pass over the cards of a deck that were due at start time.
#[derive(Debug, Clone)]
pub struct StudySession {
    queue: Vec<Card>,
    cursor: usize,
    revealed: bool,
    phase: SessionPhase,
    scheduler: Scheduler,
}

impl StudySession {
    /// Build a session from a deck's cards.
    ///
    /// Keeps the cards due at `now`, shuffles them with a uniform
    /// Fisher-Yates permutation and freezes the result. Selection and
    /// ordering happen here and never again for the session's lifetime.
    pub fn begin<R: Rng + ?Sized>(cards: &[Card], now: DateTime<Utc>, rng: &mut R) -> Self {
        let mut queue: Vec<Card> = cards.iter().filter(|c| c.is_due(now)).cloned().collect();
        queue.shuffle(rng);
        let phase = if queue.is_empty() {
            SessionPhase::Empty
        } else {
            SessionPhase::Active
        };
        Self {
            queue,
            cursor: 0,
            revealed: false,
            phase,
            scheduler: Scheduler::default(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Number of cards the session will present in total.
    pub fn total(&self) -> usize {
        self.queue.len()
    }

    /// Cards already rated or marked done. Equals `total` once finished.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Scheduler driving this session; also used for dry-run interval
    /// previews on the rating controls.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Card currently presented, if any.
    pub fn current(&self) -> Option<&Card> {
        match self.phase {
            SessionPhase::Active => self.queue.get(self.cursor),
            SessionPhase::Finished | SessionPhase::Empty => None,
        }
    }

    /// Flip the answer visibility of the presented card.
    pub fn toggle_reveal(&mut self) -> Result<bool, SessionError> {
        if self.phase != SessionPhase::Active {
            return Err(SessionError::NoActiveCard);
        }
        self.revealed = !self.revealed;
        Ok(self.revealed)
    }

    /// Apply `rating` to the presented card and advance.
    ///
    /// Runs the scheduler on the card's state, keeps identity and content
    /// untouched, and returns the updated card for the caller to persist.
    pub fn rate(&mut self, rating: Rating, now: DateTime<Utc>) -> Result<Card, SessionError> {
        if self.phase != SessionPhase::Active {
            return Err(SessionError::NoActiveCard);
        }
        let card = self
            .queue
            .get_mut(self.cursor)
            .ok_or(SessionError::NoActiveCard)?;
        card.state = self.scheduler.next_state(&card.state, rating, now);
        let updated = card.clone();
        self.advance();
        Ok(updated)
    }

    /// Mark the presented card done and advance without rescheduling.
    ///
    /// Interval, repetition, ease and due date all stay as they were; the
    /// card simply stops qualifying for future queues until the flag is
    /// cleared by an edit.
    pub fn mark_done(&mut self) -> Result<Card, SessionError> {
        if self.phase != SessionPhase::Active {
            return Err(SessionError::NoActiveCard);
        }
        let card = self
            .queue
            .get_mut(self.cursor)
            .ok_or(SessionError::NoActiveCard)?;
        card.state.done = true;
        let updated = card.clone();
        self.advance();
        Ok(updated)
    }

    fn advance(&mut self) {
        self.cursor += 1;
        self.revealed = false;
        if self.cursor >= self.queue.len() {
            self.phase = SessionPhase::Finished;
        }
    }
}
