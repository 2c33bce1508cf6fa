//! Per-list progress summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::selector::is_due;
use crate::types::{Difficulty, Item, LearningStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListStats {
    pub total: usize,
    pub learned: usize,
    pub learning: usize,
    pub not_learned: usize,
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
    pub due: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_ease: Option<f64>,
}

impl ListStats {
    pub fn collect(items: &[Item], now: DateTime<Utc>) -> Self {
        let mut stats = items.iter().fold(Self::default(), |mut acc, item| {
            let state = &item.scheduling;
            match state.learning_status {
                LearningStatus::Learned => acc.learned += 1,
                LearningStatus::Learning => acc.learning += 1,
                LearningStatus::NotLearned => acc.not_learned += 1,
            }
            match item.difficulty {
                Difficulty::Easy => acc.easy += 1,
                Difficulty::Medium => acc.medium += 1,
                Difficulty::Hard => acc.hard += 1,
            }
            if is_due(state, now) {
                acc.due += 1;
            }
            acc
        });

        stats.total = items.len();
        if !items.is_empty() {
            let sum: f64 = items.iter().map(|i| i.scheduling.ease_factor).sum();
            stats.average_ease = Some(sum / items.len() as f64);
        }
        stats
    }
}
