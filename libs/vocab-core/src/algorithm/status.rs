//! Learning-status transition after a review.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{LearningStatus, Quality, ReviewRecord};

/// Thresholds for promoting an item to learned or demoting it to learning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusThresholds {
    /// Most recent history entries considered.
    pub window: usize,
    /// Completed reviews that must be exceeded before an item counts as learned.
    pub min_reviews: u32,
    pub learned_rate: f64,
    pub struggling_rate: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            window: 5,
            min_reviews: 3,
            learned_rate: 0.8,
            struggling_rate: 0.6,
        }
    }
}

impl StatusThresholds {
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(Error::InvalidSettings(
                "status window must be at least 1".to_string(),
            ));
        }
        for (name, rate) in [
            ("learned_rate", self.learned_rate),
            ("struggling_rate", self.struggling_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(Error::InvalidSettings(format!(
                    "{name} must be within [0, 1], got {rate}"
                )));
            }
        }
        Ok(())
    }

    /// Fraction of the last `window` reviews rated good. Zero with no history.
    pub fn recent_success_rate(&self, history: &[ReviewRecord]) -> f64 {
        let start = history.len().saturating_sub(self.window);
        let recent = &history[start..];
        if recent.is_empty() {
            return 0.0;
        }
        let good = recent.iter().filter(|r| r.quality.is_good()).count();
        good as f64 / recent.len() as f64
    }

    /// Derive the status after a review.
    ///
    /// `review_count` and `history` are the post-review values. When neither
    /// threshold is hit the current status is kept as is.
    pub fn next_status(
        &self,
        current: LearningStatus,
        quality: Quality,
        review_count: u32,
        history: &[ReviewRecord],
    ) -> LearningStatus {
        let rate = self.recent_success_rate(history);
        if quality.is_good() && review_count > self.min_reviews && rate >= self.learned_rate {
            LearningStatus::Learned
        } else if quality.is_failing() || rate < self.struggling_rate {
            LearningStatus::Learning
        } else {
            current
        }
    }
}
