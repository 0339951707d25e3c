//! Review session: walks a learner through the cards of one deck that were
//! due when the session was loaded, one card at a time.
//!
//! Idle -> Loaded -> Presenting -> AwaitingOutcome -> Committing -> Presenting | Complete
//!
//! A failed commit leaves the session in `Error` on the same card so the
//! outcome can be submitted again. The queue is fixed at load time; cards
//! that become due later need a new session.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::card::{Card, CardId, DeckId, SchedulingState};
use super::due::select_due;
use super::interval;
use super::outcome::ReviewOutcome;
use crate::clock::Clock;
use crate::database::store::{CardStore, ReviewCommit, StoreError};
use crate::error::{SessionError, SessionResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loaded,
    /// Front of the current card is shown, back withheld.
    Presenting,
    /// Back revealed; waiting for forgot / struggled / easy.
    AwaitingOutcome,
    Committing,
    Complete,
    Error,
}

/// What happened to a submitted outcome.
#[derive(Clone, Debug, PartialEq)]
pub enum Submission {
    Committed {
        card_id: CardId,
        state: SchedulingState,
    },
    /// The card vanished from the store before commit; it was skipped.
    Dropped { card_id: CardId },
    /// The card was already handled in this session; nothing was written.
    Duplicate { card_id: CardId },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutcomeTally {
    pub forgot: usize,
    pub struggled: usize,
    pub easy: usize,
}

impl OutcomeTally {
    fn record(&mut self, outcome: ReviewOutcome) {
        match outcome {
            ReviewOutcome::Forgot => self.forgot += 1,
            ReviewOutcome::Struggled => self.struggled += 1,
            ReviewOutcome::Easy => self.easy += 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionProgress {
    /// Cards handled so far (committed or dropped).
    pub position: usize,
    pub total: usize,
    pub reviewed: usize,
    pub dropped: usize,
    pub outcomes: OutcomeTally,
}

impl SessionProgress {
    pub fn remaining(&self) -> usize {
        self.total - self.position
    }
}

pub struct ReviewSession {
    deck_id: DeckId,
    store: Arc<dyn CardStore>,
    clock: Arc<dyn Clock>,
    state: SessionState,
    loaded: bool,
    queue: Vec<Card>,
    cursor: usize,
    revealed: bool,
    handled: HashSet<CardId>,
    progress: SessionProgress,
    last_error: Option<String>,
}

impl ReviewSession {
    pub fn new(deck_id: DeckId, store: Arc<dyn CardStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            deck_id,
            store,
            clock,
            state: SessionState::Idle,
            loaded: false,
            queue: Vec::new(),
            cursor: 0,
            revealed: false,
            handled: HashSet::new(),
            progress: SessionProgress::default(),
            last_error: None,
        }
    }

    /// Fetches the due queue. An empty queue completes the session at once.
    ///
    /// Calling again after a failed fetch retries it; once loaded this is a no-op.
    pub fn load(&mut self) -> SessionResult<()> {
        if self.loaded {
            return Ok(());
        }

        self.state = SessionState::Loaded;
        let as_of = self.clock.now();
        let cards = match self.store.fetch_due(self.deck_id, as_of) {
            Ok(cards) => cards,
            Err(e) => {
                warn!(deck_id = %self.deck_id, error = %e, "failed to load due cards");
                self.fail(&e);
                return Err(e.into());
            }
        };

        self.queue = select_due(cards, self.deck_id, as_of);
        self.loaded = true;
        self.last_error = None;
        self.progress.total = self.queue.len();
        info!(deck_id = %self.deck_id, due = self.queue.len(), "review session loaded");

        self.state = if self.queue.is_empty() {
            SessionState::Complete
        } else {
            SessionState::Presenting
        };
        Ok(())
    }

    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    /// Message of the store failure that put the session in `Error`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn progress(&self) -> SessionProgress {
        self.progress
    }

    /// Cards not yet handled, current card first.
    pub fn remaining_cards(&self) -> &[Card] {
        self.queue.get(self.cursor..).unwrap_or(&[])
    }

    pub fn current_card(&self) -> Option<&Card> {
        match self.state {
            SessionState::Presenting
            | SessionState::AwaitingOutcome
            | SessionState::Committing
            | SessionState::Error => self.queue.get(self.cursor),
            _ => None,
        }
    }

    pub fn front(&self) -> Option<&str> {
        self.current_card().map(|card| card.front_content.as_str())
    }

    /// Back content, only once revealed.
    pub fn back(&self) -> Option<&str> {
        if !self.revealed {
            return None;
        }
        self.current_card().map(|card| card.back_content.as_str())
    }

    /// Reveals the back of the current card. Revealing twice is harmless.
    pub fn reveal(&mut self) -> SessionResult<&str> {
        match self.state {
            SessionState::Presenting => {
                self.revealed = true;
                self.state = SessionState::AwaitingOutcome;
            }
            SessionState::AwaitingOutcome => {}
            SessionState::Error if self.revealed => {}
            _ => return Err(SessionError::NoActiveCard),
        }
        self.back().ok_or(SessionError::NoActiveCard)
    }

    /// Applies the learner's outcome to the presented card and commits it.
    ///
    /// `card_id` names the card the learner answered; an outcome for a card
    /// already handled in this session is reported as `Duplicate` and never
    /// reaches the store.
    pub fn submit(&mut self, card_id: CardId, outcome: ReviewOutcome) -> SessionResult<Submission> {
        if self.handled.contains(&card_id) {
            debug!(%card_id, %outcome, "duplicate submission ignored");
            return Ok(Submission::Duplicate { card_id });
        }

        match self.state {
            SessionState::AwaitingOutcome => {}
            SessionState::Error if self.revealed => {}
            SessionState::Presenting => return Err(SessionError::NotRevealed),
            SessionState::Committing => return Err(SessionError::CommitInFlight),
            _ => return Err(SessionError::NoActiveCard),
        }

        let current = self.queue.get(self.cursor).ok_or(SessionError::NoActiveCard)?;
        if current.id != card_id {
            return Err(SessionError::StaleCard(card_id));
        }

        self.state = SessionState::Committing;
        let state = interval::next_state(current.interval_days, current.ease_factor, outcome);
        let commit = ReviewCommit {
            card_id,
            state,
            reviewed_at: self.clock.now(),
        };

        match self.store.commit_review(&commit) {
            Ok(()) => {
                if let Some(card) = self.queue.get_mut(self.cursor) {
                    card.apply_review(state, commit.reviewed_at);
                }
                debug!(
                    %card_id,
                    %outcome,
                    interval_days = state.interval_days,
                    ease_factor = state.ease_factor,
                    "card reviewed"
                );
                self.progress.reviewed += 1;
                self.progress.outcomes.record(outcome);
                self.advance(card_id);
                Ok(Submission::Committed { card_id, state })
            }
            Err(StoreError::NotFound(_)) => {
                warn!(%card_id, "card disappeared before commit, dropping it");
                self.progress.dropped += 1;
                self.advance(card_id);
                Ok(Submission::Dropped { card_id })
            }
            Err(e) => {
                warn!(%card_id, error = %e, "commit failed, card stays presented");
                self.fail(&e);
                Err(e.into())
            }
        }
    }

    fn fail(&mut self, error: &StoreError) {
        self.state = SessionState::Error;
        self.last_error = Some(error.to_string());
    }

    fn advance(&mut self, card_id: CardId) {
        self.handled.insert(card_id);
        self.cursor += 1;
        self.progress.position = self.cursor;
        self.revealed = false;
        self.last_error = None;

        if self.cursor >= self.queue.len() {
            self.state = SessionState::Complete;
            info!(
                deck_id = %self.deck_id,
                reviewed = self.progress.reviewed,
                dropped = self.progress.dropped,
                "review session complete"
            );
        } else {
            self.state = SessionState::Presenting;
        }
    }
}
