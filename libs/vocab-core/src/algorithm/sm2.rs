//! SM-2 variant with weighted recent performance, streak bonus and jitter.
//!
//! Ease moves with an exponentially weighted average of recent ratings rather
//! than the current rating alone. From the third review on, intervals grow by
//! ease, a rating factor, a capped streak bonus and a small random factor that
//! keeps items studied together from falling due together.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{JitterSource, ReviewOutcome};
use crate::error::{Error, Result};
use crate::types::{Quality, ReviewRecord, SchedulingState};

/// Calculator parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Sm2 {
    pub min_ease: f64,
    pub max_ease: f64,
    /// Number of most recent history entries blended into performance.
    pub performance_window: usize,
    /// History entries kept after each review.
    pub history_limit: usize,
    pub streak_bonus_step: f64,
    pub streak_bonus_cap: f64,
    pub good_performance_factor: f64,
    pub pass_performance_factor: f64,
    pub poor_performance_factor: f64,
    pub second_review_good_interval: u32,
    pub second_review_pass_interval: u32,
    /// Upper bound in days on any assigned interval.
    pub max_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            min_ease: 1.3,
            max_ease: 2.5,
            performance_window: 5,
            history_limit: 10,
            streak_bonus_step: 0.05,
            streak_bonus_cap: 0.2,
            good_performance_factor: 1.1,
            pass_performance_factor: 1.0,
            poor_performance_factor: 0.9,
            second_review_good_interval: 3,
            second_review_pass_interval: 2,
            max_interval: 36_500,
        }
    }
}

impl Sm2 {
    /// Reject parameters the calculator cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.min_ease.is_finite()
            || !self.max_ease.is_finite()
            || self.min_ease <= 0.0
            || self.min_ease > self.max_ease
        {
            return Err(Error::InvalidSettings(format!(
                "ease bounds [{}, {}] must be positive and ordered",
                self.min_ease, self.max_ease
            )));
        }
        for (name, value) in [
            ("streak_bonus_step", self.streak_bonus_step),
            ("streak_bonus_cap", self.streak_bonus_cap),
            ("good_performance_factor", self.good_performance_factor),
            ("pass_performance_factor", self.pass_performance_factor),
            ("poor_performance_factor", self.poor_performance_factor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidSettings(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.history_limit == 0 {
            return Err(Error::InvalidSettings(
                "history_limit must be at least 1".to_string(),
            ));
        }
        if self.max_interval == 0 {
            return Err(Error::InvalidSettings(
                "max_interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Compute ease, interval, streaks and history after a review.
    ///
    /// `jitter` is only consulted once the item is past its second review.
    pub fn compute_next_review(
        &self,
        quality: Quality,
        state: &SchedulingState,
        now: DateTime<Utc>,
        jitter: &dyn JitterSource,
    ) -> ReviewOutcome {
        let performance = self.recent_performance(&state.review_history, quality);
        let ease_factor = self.next_ease(state.ease_factor, performance);
        let (streak_count, best_streak) =
            Self::next_streak(quality, state.streak_count, state.best_streak);
        let review_interval = self.next_interval(quality, state, ease_factor, jitter);

        let mut review_history = state.review_history.clone();
        review_history.push(ReviewRecord {
            quality,
            date: now,
            interval: review_interval,
        });
        if review_history.len() > self.history_limit {
            let excess = review_history.len() - self.history_limit;
            review_history.drain(..excess);
        }

        ReviewOutcome {
            ease_factor,
            review_interval,
            streak_count,
            best_streak,
            review_history,
        }
    }

    /// Weighted average of the last `performance_window` ratings, most recent
    /// weighted 1, then 1/2, 1/4, ... Falls back to `current` with no history.
    pub fn recent_performance(&self, history: &[ReviewRecord], current: Quality) -> f64 {
        let start = history.len().saturating_sub(self.performance_window);
        let recent = &history[start..];
        if recent.is_empty() {
            return current.value() as f64;
        }

        let (weighted, total_weight) = recent.iter().rev().enumerate().fold(
            (0.0, 0.0),
            |(weighted, total), (index, record)| {
                let weight = 0.5_f64.powi(index as i32);
                (
                    weighted + record.quality.value() as f64 * weight,
                    total + weight,
                )
            },
        );
        weighted / total_weight
    }

    /// EF' = EF + (0.1 - (5 - p) * (0.08 + (5 - p) * 0.02)), clamped.
    fn next_ease(&self, ease_factor: f64, performance: f64) -> f64 {
        let miss = 5.0 - performance;
        let updated = ease_factor + (0.1 - miss * (0.08 + miss * 0.02));
        updated.max(self.min_ease).min(self.max_ease)
    }

    /// Good ratings extend the streak, failing ratings reset it, a bare pass
    /// (3) leaves it alone.
    fn next_streak(quality: Quality, streak: u32, best: u32) -> (u32, u32) {
        if quality.is_good() {
            let streak = streak + 1;
            (streak, best.max(streak))
        } else if quality.is_failing() {
            (0, best)
        } else {
            (streak, best)
        }
    }

    fn next_interval(
        &self,
        quality: Quality,
        state: &SchedulingState,
        ease_factor: f64,
        jitter: &dyn JitterSource,
    ) -> u32 {
        if quality.is_failing() {
            return 1;
        }
        let interval = match state.review_count {
            0 => 1,
            1 if quality.is_good() => self.second_review_good_interval,
            1 => self.second_review_pass_interval,
            _ => {
                let performance_factor = match quality.value() {
                    4..=5 => self.good_performance_factor,
                    3 => self.pass_performance_factor,
                    _ => self.poor_performance_factor,
                };
                // Bonus uses the streak as it stood before this review.
                let streak_bonus =
                    (state.streak_count as f64 * self.streak_bonus_step).min(self.streak_bonus_cap);
                let interval = state.review_interval as f64
                    * ease_factor
                    * performance_factor
                    * (1.0 + streak_bonus)
                    * jitter.factor();
                interval.round().max(1.0) as u32
            }
        };
        interval.min(self.max_interval).max(1)
    }
}
