use thiserror::Error;

use crate::database::store::StoreError;
use crate::models::CardId;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no card is being presented")]
    NoActiveCard,

    #[error("the answer has not been revealed yet")]
    NotRevealed,

    #[error("card {0} is not the card being presented")]
    StaleCard(CardId),

    #[error("a review is already being committed")]
    CommitInFlight,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Rejected locally without reaching the store.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
