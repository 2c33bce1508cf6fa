//! Factory functions for scheduling states and history.

use chrono::{DateTime, Duration, Utc};

use vocab_core::{LearningStatus, Quality, ReviewRecord, SchedulingState};

/// History entries with the given qualities, one day apart, ending at `end`.
pub fn history(qualities: &[u8], end: DateTime<Utc>) -> Vec<ReviewRecord> {
    let n = qualities.len() as i64;
    qualities
        .iter()
        .enumerate()
        .map(|(i, &q)| ReviewRecord {
            quality: Quality::new(q).unwrap(),
            date: end - Duration::days(n - 1 - i as i64),
            interval: 1,
        })
        .collect()
}

/// A state last reviewed `days_ago` days before `now` with the given interval.
pub fn reviewed_state(
    now: DateTime<Utc>,
    days_ago: i64,
    interval: u32,
    ease: f64,
    status: LearningStatus,
) -> SchedulingState {
    SchedulingState {
        ease_factor: ease,
        review_interval: interval,
        review_count: 3,
        last_practiced: Some(now - Duration::days(days_ago)),
        learning_status: status,
        ..Default::default()
    }
}
