//! Applies a review to an item's scheduling state.

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::{JitterSource, ReviewOutcome, SchedulingResult, Sm2, StatusThresholds, ThreadJitter};
use crate::error::Result;
use crate::types::{Quality, SchedulingState};

/// Review outcome calculator plus status thresholds and a jitter source.
#[derive(Debug, Clone, Default)]
pub struct Scheduler<J = ThreadJitter> {
    sm2: Sm2,
    thresholds: StatusThresholds,
    jitter: J,
}

impl<J: JitterSource> Scheduler<J> {
    /// Build a scheduler from loaded parameters, rejecting invalid ones.
    pub fn new(sm2: Sm2, thresholds: StatusThresholds, jitter: J) -> Result<Self> {
        sm2.validate()?;
        thresholds.validate()?;
        jitter.validate()?;
        Ok(Self {
            sm2,
            thresholds,
            jitter,
        })
    }

    /// Scheduler with default parameters and the given jitter source.
    pub fn with_jitter(jitter: J) -> Self {
        Self {
            sm2: Sm2::default(),
            thresholds: StatusThresholds::default(),
            jitter,
        }
    }

    /// Ease, interval, streaks and history after a review.
    pub fn compute_next_review(
        &self,
        quality: Quality,
        state: &SchedulingState,
        now: DateTime<Utc>,
    ) -> ReviewOutcome {
        self.sm2.compute_next_review(quality, state, now, &self.jitter)
    }

    /// Full replacement state after a review at `now`.
    ///
    /// The next review falls on the start of the UTC day plus the new interval.
    pub fn apply_review(
        &self,
        state: &SchedulingState,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> SchedulingResult {
        let outcome = self.compute_next_review(quality, state, now);

        let review_count = state.review_count + 1;
        let next_due = start_of_day(now)
            .checked_add_signed(Duration::days(i64::from(outcome.review_interval)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let learning_status = self.thresholds.next_status(
            state.learning_status,
            quality,
            review_count,
            &outcome.review_history,
        );

        tracing::debug!(
            quality = quality.value(),
            interval = outcome.review_interval,
            ease = outcome.ease_factor,
            status = learning_status.as_str(),
            "scheduled review"
        );

        SchedulingResult {
            new_state: SchedulingState {
                ease_factor: outcome.ease_factor,
                review_interval: outcome.review_interval,
                review_count,
                streak_count: outcome.streak_count,
                best_streak: outcome.best_streak,
                review_history: outcome.review_history,
                last_practiced: Some(now),
                next_review_date: Some(next_due),
                learning_status,
            },
            next_due,
        }
    }
}

/// Midnight UTC of the day containing `at`.
pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&at.date_naive().and_time(chrono::NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::FixedJitter;
    use crate::error::Error;
    use crate::types::LearningStatus;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 14, 30, 0).unwrap()
    }

    fn q(value: u8) -> Quality {
        Quality::new(value).unwrap()
    }

    fn scheduler() -> Scheduler<FixedJitter> {
        Scheduler::with_jitter(FixedJitter(1.0))
    }

    #[test]
    fn start_of_day_truncates_time() {
        assert_eq!(
            start_of_day(now()),
            Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn first_review_from_default_state() {
        let result = scheduler().apply_review(&SchedulingState::default(), q(4), now());
        let state = &result.new_state;

        assert_eq!(state.review_count, 1);
        assert_eq!(state.review_interval, 1);
        assert_eq!(state.streak_count, 1);
        assert_eq!(state.best_streak, 1);
        assert_eq!(state.last_practiced, Some(now()));
        assert_eq!(
            result.next_due,
            Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()
        );
        assert_eq!(state.next_review_date, Some(result.next_due));
        assert_eq!(state.review_history.len(), 1);
        // Single good review: rate 1.0 but too few reviews, so status is kept.
        assert_eq!(state.learning_status, LearningStatus::NotLearned);
    }

    #[test]
    fn failing_first_review_moves_to_learning() {
        let result = scheduler().apply_review(&SchedulingState::default(), q(1), now());
        assert_eq!(result.new_state.learning_status, LearningStatus::Learning);
        assert_eq!(result.new_state.streak_count, 0);
    }

    #[test]
    fn fourth_perfect_review_marks_learned() {
        let s = scheduler();
        let mut state = SchedulingState::default();
        let mut at = now();

        for _ in 0..3 {
            state = s.apply_review(&state, q(5), at).new_state;
            assert_ne!(state.learning_status, LearningStatus::Learned);
            at += Duration::days(state.review_interval as i64);
        }

        state = s.apply_review(&state, q(5), at).new_state;
        assert_eq!(state.review_count, 4);
        assert_eq!(state.learning_status, LearningStatus::Learned);
    }

    #[test]
    fn next_due_uses_new_interval() {
        let state = SchedulingState {
            ease_factor: 2.5,
            review_interval: 6,
            review_count: 2,
            streak_count: 1,
            best_streak: 1,
            ..Default::default()
        };
        let result = scheduler().apply_review(&state, q(3), now());
        // Empty history: performance 3 -> ease 2.36; round(6 * 2.36 * 1.05) = 15
        assert_eq!(result.new_state.review_interval, 15);
        assert_eq!(
            result.next_due,
            Utc.with_ymd_and_hms(2024, 3, 25, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn oversized_interval_is_capped() {
        let state = SchedulingState {
            review_interval: 200_000_000,
            review_count: 5,
            ..Default::default()
        };
        let result = scheduler().apply_review(&state, q(3), now());
        assert_eq!(result.new_state.review_interval, 36_500);
        assert_eq!(result.next_due, start_of_day(now()) + Duration::days(36_500));
    }

    #[test]
    fn next_due_saturates_past_calendar_range() {
        let sm2 = Sm2 {
            max_interval: u32::MAX,
            ..Default::default()
        };
        let s = Scheduler::new(sm2, StatusThresholds::default(), FixedJitter(1.0)).unwrap();
        let state = SchedulingState {
            review_interval: u32::MAX,
            review_count: 5,
            ..Default::default()
        };
        let result = s.apply_review(&state, q(5), now());
        assert_eq!(result.new_state.review_interval, u32::MAX);
        assert_eq!(result.next_due, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn new_rejects_inverted_ease_bounds() {
        let sm2: Sm2 = serde_json::from_str(r#"{"min_ease": 2.5, "max_ease": 1.3}"#).unwrap();
        assert!(matches!(
            Scheduler::new(sm2, StatusThresholds::default(), FixedJitter(1.0)),
            Err(Error::InvalidSettings(_))
        ));
    }

    #[test]
    fn new_rejects_invalid_thresholds_and_jitter() {
        let thresholds = StatusThresholds {
            learned_rate: 1.5,
            ..Default::default()
        };
        assert!(Scheduler::new(Sm2::default(), thresholds, FixedJitter(1.0)).is_err());

        let jitter = ThreadJitter {
            min: f64::NAN,
            max: 1.05,
        };
        assert!(Scheduler::new(Sm2::default(), StatusThresholds::default(), jitter).is_err());
        let jitter = FixedJitter(0.0);
        assert!(Scheduler::new(Sm2::default(), StatusThresholds::default(), jitter).is_err());
    }

    #[test]
    fn new_accepts_defaults() {
        assert!(Scheduler::new(
            Sm2::default(),
            StatusThresholds::default(),
            ThreadJitter::default()
        )
        .is_ok());
    }

    #[test]
    fn apply_review_does_not_touch_input() {
        let state = SchedulingState::default();
        let before = state.clone();
        let _ = scheduler().apply_review(&state, q(5), now());
        assert_eq!(state, before);
    }
}
