//! Store double for session tests: wraps the in-memory SQLite store, counts
//! calls and fails on request.
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::db::SqliteCardStore;
use super::store::{CardStore, ReviewCommit, StoreError, StoreResult};
use crate::models::{Card, DeckId};

pub struct FlakyStore {
    pub inner: SqliteCardStore,
    fail_fetch: AtomicBool,
    failing_commits: AtomicUsize,
    fetch_calls: AtomicUsize,
    commit_calls: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: SqliteCardStore) -> Self {
        Self {
            inner,
            fail_fetch: AtomicBool::new(false),
            failing_commits: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            commit_calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// The next `n` commits fail with `Unavailable`.
    pub fn fail_next_commits(&self, n: usize) {
        self.failing_commits.store(n, Ordering::SeqCst);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn commit_calls(&self) -> usize {
        self.commit_calls.load(Ordering::SeqCst)
    }
}

impl CardStore for FlakyStore {
    fn fetch_due(&self, deck_id: DeckId, as_of: DateTime<Utc>) -> StoreResult<Vec<Card>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        self.inner.fetch_due(deck_id, as_of)
    }

    fn commit_review(&self, commit: &ReviewCommit) -> StoreResult<()> {
        self.commit_calls.fetch_add(1, Ordering::SeqCst);
        let should_fail = self
            .failing_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(StoreError::Unavailable("timed out".into()));
        }
        self.inner.commit_review(commit)
    }
}
