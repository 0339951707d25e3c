//! Deck is a named group of cards. The scheduler only uses it as a query key.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::card::DeckId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: DeckId,
    pub title: String,
}

impl Deck {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
        }
    }
}
