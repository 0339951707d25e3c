//! The read/write contract the review session needs from persistent storage.
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Card, CardId, DeckId, SchedulingState};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("card not found: {0}")]
    NotFound(CardId),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("corrupt card record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Scheduling fields written by one review.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReviewCommit {
    pub card_id: CardId,
    pub state: SchedulingState,
    pub reviewed_at: DateTime<Utc>,
}

pub trait CardStore: Send + Sync {
    /// Cards of `deck_id` with `next_review_at <= as_of`, oldest due first,
    /// ties broken by id.
    fn fetch_due(&self, deck_id: DeckId, as_of: DateTime<Utc>) -> StoreResult<Vec<Card>>;

    /// Atomically sets interval and ease, stamps `last_reviewed_at`, moves
    /// `next_review_at` to `reviewed_at + interval` days and increments
    /// `review_count`. Fails with `NotFound` when the card no longer exists.
    fn commit_review(&self, commit: &ReviewCommit) -> StoreResult<()>;
}
