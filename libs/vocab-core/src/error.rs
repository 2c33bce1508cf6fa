//! Error types for vocab-core.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the scheduling engine and its storage boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid quality rating {value}: expected 0-5")]
    InvalidQuality { value: u8 },

    #[error("not enough items for a session: {available} due, {required} required")]
    NotEnoughItems { available: usize, required: usize },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("concurrent update on item {id}: expected review count {expected}, found {actual}")]
    Conflict { id: Uuid, expected: u32, actual: u32 },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}
