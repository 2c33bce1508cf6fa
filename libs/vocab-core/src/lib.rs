//! Spaced repetition scheduling core for the vocabulary app.
//!
//! Provides:
//! - Review outcome calculator (SM-2 variant with weighted recent performance,
//!   streak bonus and interval jitter)
//! - Scheduling applier deriving next-due date and learning status
//! - Due-item selection and practice session building
//! - Repository boundary with compare-and-swap writes and a review service
//! - Shared types (Item, SchedulingState, Quality, LearningStatus, etc.)

pub mod algorithm;
pub mod clock;
pub mod error;
pub mod repository;
pub mod selector;
pub mod service;
pub mod session;
pub mod stats;
pub mod types;

pub use algorithm::{
    FixedJitter, JitterSource, ReviewOutcome, Scheduler, SchedulingResult, Sm2,
    StatusThresholds, ThreadJitter,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use repository::{ItemRepository, MemoryRepository};
pub use selector::{is_due, select_due};
pub use service::ReviewService;
pub use session::build_session;
pub use stats::ListStats;
pub use types::{
    Difficulty, EffectiveSettings, GlobalSettings, Item, LearningStatus, ListSettings, Quality,
    ReviewRecord, SchedulingState,
};
