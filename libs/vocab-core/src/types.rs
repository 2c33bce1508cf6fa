//! Core types for vocabulary scheduling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Coarse learning classification of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningStatus {
    NotLearned,
    Learning,
    Learned,
}

impl Default for LearningStatus {
    fn default() -> Self {
        Self::NotLearned
    }
}

impl LearningStatus {
    /// Get the status name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotLearned => "not_learned",
            Self::Learning => "learning",
            Self::Learned => "learned",
        }
    }

    /// Parse from the stored name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "not_learned" => Some(Self::NotLearned),
            "learning" => Some(Self::Learning),
            "learned" => Some(Self::Learned),
            _ => None,
        }
    }
}

/// Author-assigned difficulty of a word. Not used by scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

/// Self-assessed recall quality for a single review (0 = blackout, 5 = perfect).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;

    /// Validate a raw rating. Out-of-range values are rejected, never clamped.
    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX {
            return Err(Error::InvalidQuality { value });
        }
        Ok(Self(value))
    }

    /// Map a multiple-choice quiz answer to a rating.
    /// Correct -> 5, incorrect -> 2
    pub fn from_answer(correct: bool) -> Self {
        if correct { Self(5) } else { Self(2) }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Rating counts towards a streak (>= 4).
    pub fn is_good(self) -> bool {
        self.0 >= 4
    }

    /// Rating counts as forgetting (< 3).
    pub fn is_failing(self) -> bool {
        self.0 < 3
    }
}

impl TryFrom<u8> for Quality {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

/// One entry in an item's bounded review history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub quality: Quality,
    pub date: DateTime<Utc>,
    /// Interval in days assigned by this review.
    pub interval: u32,
}

/// Scheduling state embedded in each learnable item.
///
/// Missing fields deserialize to their defaults, so a record written before
/// its first review loads as a fresh state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingState {
    pub ease_factor: f64,
    pub review_interval: u32,
    pub review_count: u32,
    pub streak_count: u32,
    pub best_streak: u32,
    pub review_history: Vec<ReviewRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_practiced: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<DateTime<Utc>>,
    pub learning_status: LearningStatus,
}

impl Default for SchedulingState {
    fn default() -> Self {
        Self {
            ease_factor: 2.5,
            review_interval: 0,
            review_count: 0,
            streak_count: 0,
            best_streak: 0,
            review_history: Vec::new(),
            last_practiced: None,
            next_review_date: None,
            learning_status: LearningStatus::NotLearned,
        }
    }
}

/// A vocabulary item with its scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub list_id: Uuid,
    pub original: String,
    pub translation: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub scheduling: SchedulingState,
}

impl Item {
    /// Create a fresh, never-reviewed item.
    pub fn new(list_id: Uuid, original: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            list_id,
            original: original.into(),
            translation: translation.into(),
            difficulty: Difficulty::default(),
            scheduling: SchedulingState::default(),
        }
    }
}

/// Global session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// Number of items presented per session.
    pub session_size: usize,
    /// Fewer due items than this is reported as not enough items.
    pub minimum_session_size: usize,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            session_size: 5,
            minimum_session_size: 5,
        }
    }
}

impl GlobalSettings {
    /// Load settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Per-list settings (all fields optional for overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSettings {
    pub list_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_session_size: Option<usize>,
}

impl ListSettings {
    /// Create list settings with only the list id set.
    pub fn new(list_id: Uuid) -> Self {
        Self {
            list_id,
            session_size: None,
            minimum_session_size: None,
        }
    }
}

/// Effective settings (global merged with list overrides).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveSettings {
    pub session_size: usize,
    pub minimum_session_size: usize,
}

impl EffectiveSettings {
    /// Merge global settings with optional list settings.
    pub fn merge(global: &GlobalSettings, list: Option<&ListSettings>) -> Self {
        match list {
            Some(l) => Self {
                session_size: l.session_size.unwrap_or(global.session_size),
                minimum_session_size: l
                    .minimum_session_size
                    .unwrap_or(global.minimum_session_size),
            },
            None => Self {
                session_size: global.session_size,
                minimum_session_size: global.minimum_session_size,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.session_size == 0 {
            return Err(Error::InvalidSettings(
                "session_size must be at least 1".to_string(),
            ));
        }
        if self.minimum_session_size > self.session_size {
            return Err(Error::InvalidSettings(format!(
                "minimum_session_size {} exceeds session_size {}",
                self.minimum_session_size, self.session_size
            )));
        }
        Ok(())
    }
}

impl Default for EffectiveSettings {
    fn default() -> Self {
        Self::merge(&GlobalSettings::default(), None)
    }
}
