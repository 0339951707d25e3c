//! Entry point that wires a store and a learner's clock into a review session.
use std::sync::Arc;
use tracing::warn;

use crate::clock::Clock;
use crate::database::store::CardStore;
use crate::models::{DeckId, ReviewSession};

#[derive(Clone)]
pub struct Scheduler {
    store: Arc<dyn CardStore>,
}

impl Scheduler {
    pub fn new(store: Arc<dyn CardStore>) -> Self {
        Self { store }
    }

    /// Starts a session over the cards of `deck_id` that are due at `clock.now()`.
    ///
    /// A failed fetch is reported through the session's `Error` state;
    /// `ReviewSession::load` retries it.
    pub fn start_session(&self, deck_id: DeckId, clock: Arc<dyn Clock>) -> ReviewSession {
        let mut session = ReviewSession::new(deck_id, Arc::clone(&self.store), clock);
        if let Err(e) = session.load() {
            warn!(%deck_id, error = %e, "session started in error state");
        }
        session
    }
}
