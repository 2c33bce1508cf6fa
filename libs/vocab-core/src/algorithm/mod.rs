//! Spaced repetition scheduling.
//!
//! - `sm2`: review outcome calculator (ease, interval, streaks, history)
//! - `status`: coarse learning-status transition
//! - `scheduler`: applies an outcome to an item's full scheduling state

pub mod scheduler;
pub mod sm2;
pub mod status;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{ReviewRecord, SchedulingState};

pub use scheduler::Scheduler;
pub use sm2::Sm2;
pub use status::StatusThresholds;

/// Fields produced by the review outcome calculator. The caller merges these
/// into the full scheduling state.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub ease_factor: f64,
    pub review_interval: u32,
    pub streak_count: u32,
    pub best_streak: u32,
    pub review_history: Vec<ReviewRecord>,
}

/// Result of scheduling an item after review.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingResult {
    pub new_state: SchedulingState,
    pub next_due: DateTime<Utc>,
}

/// Source of the interval jitter factor.
pub trait JitterSource: Send + Sync {
    fn factor(&self) -> f64;

    /// Check the source can only produce usable factors.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

fn check_factor(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidSettings(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

/// Uniform jitter drawn from the thread-local RNG.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadJitter {
    pub min: f64,
    pub max: f64,
}

impl Default for ThreadJitter {
    fn default() -> Self {
        Self {
            min: 0.95,
            max: 1.05,
        }
    }
}

impl JitterSource for ThreadJitter {
    fn factor(&self) -> f64 {
        if self.min.is_finite() && self.max.is_finite() && self.min < self.max {
            rand::thread_rng().gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }

    fn validate(&self) -> Result<()> {
        check_factor("jitter min", self.min)?;
        check_factor("jitter max", self.max)?;
        if self.min > self.max {
            return Err(Error::InvalidSettings(format!(
                "jitter min {} exceeds max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Jitter pinned to a constant factor.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn factor(&self) -> f64 {
        self.0
    }

    fn validate(&self) -> Result<()> {
        check_factor("jitter factor", self.0)
    }
}
