//! Due-item selection and study priority.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::types::{Item, LearningStatus, SchedulingState};

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days elapsed since `since`, floored.
pub fn days_elapsed(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(since)
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY)
}

/// Never-practiced items are always due; otherwise the floored days since the
/// last review must reach the interval.
pub fn is_due(state: &SchedulingState, now: DateTime<Utc>) -> bool {
    match state.last_practiced {
        None => true,
        Some(last) => days_elapsed(last, now) >= state.review_interval as i64,
    }
}

/// Study priority: not-learned first, then lower ease, then oldest review.
/// Never-practiced items sort as the oldest review.
pub fn priority(a: &SchedulingState, b: &SchedulingState) -> Ordering {
    let a_new = a.learning_status == LearningStatus::NotLearned;
    let b_new = b.learning_status == LearningStatus::NotLearned;

    b_new
        .cmp(&a_new)
        .then_with(|| a.ease_factor.total_cmp(&b.ease_factor))
        // None orders before any timestamp.
        .then_with(|| a.last_practiced.cmp(&b.last_practiced))
}

/// Items due at `now`, highest priority first. Ties keep input order.
pub fn select_due(items: &[Item], now: DateTime<Utc>) -> Vec<&Item> {
    let mut due: Vec<&Item> = items
        .iter()
        .filter(|item| is_due(&item.scheduling, now))
        .collect();
    due.sort_by(|a, b| priority(&a.scheduling, &b.scheduling));
    due
}
