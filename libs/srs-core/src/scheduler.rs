//! Fixed-bucket SM-2 scheduling.
//!
//! A deliberately simplified SuperMemo 2 variant: each rating maps to a
//! fixed interval bucket instead of an ease-driven growth curve. The ease
//! factor is still tracked and clamped so history is preserved for any
//! future policy that wants it.

use crate::types::{CardState, Rating, MINIMUM_EASE};
use chrono::{DateTime, Days, Utc};

/// Scheduling policy with configurable parameters.
#[derive(Debug, Clone)]
pub struct Scheduler {
    pub minimum_ease: f64,
    pub ease_step: f64,
    pub hard_interval: f64,
    pub good_interval: f64,
    pub easy_interval: f64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            minimum_ease: MINIMUM_EASE,
            ease_step: 0.15,
            hard_interval: 1.0,
            good_interval: 5.0,
            easy_interval: 14.0,
        }
    }
}

impl Scheduler {
    /// Compute the state a card moves to when rated at `now`.
    ///
    /// Pure function of its inputs: no clock reads, no randomness, and the
    /// input state is left untouched. `last_rating` always records the
    /// rating that was applied, `Again` included.
    pub fn next_state(&self, state: &CardState, rating: Rating, now: DateTime<Utc>) -> CardState {
        let (repetition, ease_factor, interval) = match rating {
            Rating::Again => (0, state.ease_factor, 0.0),
            Rating::Hard => (
                state.repetition + 1,
                (state.ease_factor - self.ease_step).max(self.minimum_ease),
                self.hard_interval,
            ),
            Rating::Good => (state.repetition + 1, state.ease_factor, self.good_interval),
            Rating::Easy => (
                state.repetition + 1,
                state.ease_factor + self.ease_step,
                self.easy_interval,
            ),
        };

        // Buckets are whole days already; normalize anyway so a fractional
        // or negative policy value cannot reach the stored interval.
        let interval_days = interval.round().max(0.0) as u32;

        CardState {
            interval_days,
            repetition,
            ease_factor,
            due_date: now + Days::new(u64::from(interval_days)),
            last_rating: Some(rating),
            done: state.done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EPSILON: f64 = 1e-9;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn again_resets_repetition_and_keeps_card_due() {
        let scheduler = Scheduler::default();
        let now = now();
        let mut state = CardState::new(now);
        state.repetition = 4;
        state.interval_days = 14;

        let next = scheduler.next_state(&state, Rating::Again, now);
        assert_eq!(next.repetition, 0);
        assert_eq!(next.interval_days, 0);
        assert_eq!(next.due_date, now);
        assert_eq!(next.ease_factor, state.ease_factor);
        assert_eq!(next.last_rating, Some(Rating::Again));
    }

    #[test]
    fn hard_penalizes_ease_and_schedules_tomorrow() {
        let scheduler = Scheduler::default();
        let now = now();
        let state = CardState::new(now);

        let next = scheduler.next_state(&state, Rating::Hard, now);
        assert_eq!(next.repetition, 1);
        assert_eq!(next.interval_days, 1);
        assert_eq!(next.due_date, now + Days::new(1));
        assert!((next.ease_factor - 2.35).abs() < EPSILON);
        assert_eq!(next.last_rating, Some(Rating::Hard));
    }

    #[test]
    fn good_keeps_ease_and_schedules_five_days_out() {
        let scheduler = Scheduler::default();
        let now = now();
        let state = CardState::new(now);

        let next = scheduler.next_state(&state, Rating::Good, now);
        assert_eq!(next.repetition, 1);
        assert_eq!(next.interval_days, 5);
        assert_eq!(next.due_date, now + Days::new(5));
        assert_eq!(next.ease_factor, state.ease_factor);
        assert_eq!(next.last_rating, Some(Rating::Good));
    }

    #[test]
    fn easy_rewards_ease_and_schedules_two_weeks_out() {
        let scheduler = Scheduler::default();
        let now = now();
        let state = CardState::new(now);

        let next = scheduler.next_state(&state, Rating::Easy, now);
        assert_eq!(next.repetition, 1);
        assert_eq!(next.interval_days, 14);
        assert_eq!(next.due_date, now + Days::new(14));
        assert!((next.ease_factor - 2.65).abs() < EPSILON);
        assert_eq!(next.last_rating, Some(Rating::Easy));
    }

    #[test]
    fn new_card_rated_good() {
        // A freshly created card rated Good lands exactly on the
        // five-day bucket with its ease untouched.
        let scheduler = Scheduler::default();
        let now = now();
        let state = CardState::new(now);

        let next = scheduler.next_state(&state, Rating::Good, now);
        assert_eq!(next.interval_days, 5);
        assert_eq!(next.repetition, 1);
        assert_eq!(next.ease_factor, 2.5);
        assert_eq!(next.due_date, now + Days::new(5));
    }

    #[test]
    fn hard_then_easy_moves_ease_down_then_back() {
        let scheduler = Scheduler::default();
        let now = now();
        let state = CardState::new(now);

        let after_hard = scheduler.next_state(&state, Rating::Hard, now);
        assert!((after_hard.ease_factor - 2.35).abs() < EPSILON);
        assert_eq!(after_hard.interval_days, 1);
        assert_eq!(after_hard.repetition, 1);

        let later = now + Days::new(1);
        let after_easy = scheduler.next_state(&after_hard, Rating::Easy, later);
        assert!((after_easy.ease_factor - 2.5).abs() < EPSILON);
        assert_eq!(after_easy.interval_days, 14);
        assert_eq!(after_easy.repetition, 2);
        assert_eq!(after_easy.due_date, later + Days::new(14));
    }

    #[test]
    fn ease_factor_never_below_minimum() {
        let scheduler = Scheduler::default();
        let mut when = now();
        let mut state = CardState::new(when);

        for _ in 0..20 {
            state = scheduler.next_state(&state, Rating::Hard, when);
            assert!(state.ease_factor >= scheduler.minimum_ease);
            when = when + Days::new(1);
        }
        assert_eq!(state.ease_factor, scheduler.minimum_ease);
    }

    #[test]
    fn ease_floor_clamps_partial_steps() {
        let scheduler = Scheduler::default();
        let now = now();
        let mut state = CardState::new(now);
        state.ease_factor = 1.4;

        let next = scheduler.next_state(&state, Rating::Hard, now);
        assert_eq!(next.ease_factor, scheduler.minimum_ease);
    }

    #[test]
    fn ease_survives_mixed_rating_sequences() {
        let scheduler = Scheduler::default();
        let sequence = [
            Rating::Hard,
            Rating::Again,
            Rating::Hard,
            Rating::Hard,
            Rating::Easy,
            Rating::Again,
            Rating::Good,
            Rating::Hard,
            Rating::Hard,
            Rating::Hard,
            Rating::Hard,
            Rating::Hard,
            Rating::Hard,
            Rating::Hard,
            Rating::Easy,
            Rating::Hard,
        ];
        let mut when = now();
        let mut state = CardState::new(when);

        for rating in sequence {
            state = scheduler.next_state(&state, rating, when);
            assert!(state.ease_factor >= scheduler.minimum_ease);
            when = when + Days::new(1);
        }
    }

    #[test]
    fn repetition_counts_successes_until_a_lapse() {
        let scheduler = Scheduler::default();
        let now = now();
        let mut state = CardState::new(now);

        for expected in 1..=3 {
            state = scheduler.next_state(&state, Rating::Good, now);
            assert_eq!(state.repetition, expected);
        }
        state = scheduler.next_state(&state, Rating::Again, now);
        assert_eq!(state.repetition, 0);
    }

    #[test]
    fn due_date_uses_calendar_days_from_rating_time() {
        let scheduler = Scheduler::default();
        let now = now();
        let state = CardState::new(now);

        for (rating, days) in [
            (Rating::Again, 0),
            (Rating::Hard, 1),
            (Rating::Good, 5),
            (Rating::Easy, 14),
        ] {
            let next = scheduler.next_state(&state, rating, now);
            assert_eq!(next.interval_days, days);
            assert_eq!(next.due_date, now + Days::new(u64::from(days)));
        }
    }

    #[test]
    fn done_flag_passes_through_untouched() {
        let scheduler = Scheduler::default();
        let now = now();
        let mut state = CardState::new(now);
        state.done = true;

        let next = scheduler.next_state(&state, Rating::Good, now);
        assert!(next.done);
    }
}
