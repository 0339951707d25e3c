//! SQLite-backed card store
//!
//! Handles schema creation, the two scheduling operations of [`CardStore`],
//! and the deck/card insert and delete calls that card management makes.
//! Timestamps are stored as unix milliseconds so they sort numerically.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

use super::store::{CardStore, ReviewCommit, StoreError, StoreResult};
use crate::models::{Card, CardId, Deck, DeckId, card};

const CARD_COLUMNS: &str = "id, deck_id, front_content, back_content, interval_days, ease_factor,
     next_review_at, last_reviewed_at, review_count";

/// Card store over a single SQLite connection.
///
/// Clones share the connection; every call takes the mutex, so a commit and a
/// fetch never observe each other half-done.
#[derive(Clone)]
pub struct SqliteCardStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCardStore {
    /// Opens (or creates) the database file and makes sure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening card store");
        Self::from_connection(Connection::open(path)?)
    }

    /// Creates a store backed by a private in-memory database (useful for testing).
    pub fn in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wraps an open connection and creates the schema.
    fn from_connection(conn: Connection) -> StoreResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Locks the connection; a poisoned mutex reports the store as unavailable.
    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    /// Creates the decks and cards tables and the due-query index.
    ///
    /// Cards reference their deck with ON DELETE CASCADE, so deleting a deck
    /// removes its cards.
    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.lock()?;
        // Foreign keys are off by default in SQLite and are set per connection
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS decks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS cards (
                id TEXT PRIMARY KEY,
                deck_id TEXT NOT NULL,
                front_content TEXT NOT NULL,
                back_content TEXT NOT NULL,
                interval_days INTEGER NOT NULL DEFAULT 1,
                ease_factor REAL NOT NULL DEFAULT 2.5,
                next_review_at INTEGER NOT NULL,
                last_reviewed_at INTEGER,
                review_count INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (deck_id) REFERENCES decks(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_cards_deck_due ON cards(deck_id, next_review_at);
            ",
        )?;
        Ok(())
    }

    /// Creates a new deck with a fresh id.
    pub fn create_deck(&self, title: &str) -> StoreResult<Deck> {
        let deck = Deck::new(title);
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO decks (id, title) VALUES (?1, ?2)",
            params![deck.id.to_string(), deck.title],
        )?;
        info!(deck_id = %deck.id, title, "deck created");
        Ok(deck)
    }

    /// Retrieves all decks, ordered by title.
    pub fn list_decks(&self) -> StoreResult<Vec<Deck>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, title FROM decks ORDER BY title, id")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, title)| {
                Ok(Deck {
                    id: parse_uuid(&id)?,
                    title,
                })
            })
            .collect()
    }

    /// Deletes a deck together with its cards. Returns false if it did not exist.
    pub fn delete_deck(&self, deck_id: DeckId) -> StoreResult<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute(
            "DELETE FROM decks WHERE id = ?1",
            params![deck_id.to_string()],
        )?;
        Ok(deleted > 0)
    }

    /// Creates a card with default scheduling fields, due at `created_at`.
    pub fn add_card(
        &self,
        deck_id: DeckId,
        front_content: &str,
        back_content: &str,
        created_at: DateTime<Utc>,
    ) -> StoreResult<Card> {
        let card = Card::new(deck_id, front_content, back_content, created_at);
        self.insert_card(&card)?;
        Ok(card)
    }

    /// Stores a card record as given, scheduling fields included.
    pub fn insert_card(&self, card: &Card) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO cards (id, deck_id, front_content, back_content, interval_days,
                 ease_factor, next_review_at, last_reviewed_at, review_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                card.id.to_string(),
                card.deck_id.to_string(),
                card.front_content,
                card.back_content,
                card.interval_days,
                card.ease_factor,
                card.next_review_at.timestamp_millis(),
                card.last_reviewed_at.map(|at| at.timestamp_millis()),
                card.review_count,
            ],
        )?;
        Ok(())
    }

    /// Deletes a single card. Returns false if it did not exist.
    pub fn delete_card(&self, card_id: CardId) -> StoreResult<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute(
            "DELETE FROM cards WHERE id = ?1",
            params![card_id.to_string()],
        )?;
        Ok(deleted > 0)
    }

    /// Retrieves one card by id, or `None` if it does not exist.
    pub fn get_card(&self, card_id: CardId) -> StoreResult<Option<Card>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
                params![card_id.to_string()],
                CardRow::from_row,
            )
            .optional()?;
        row.map(CardRow::into_card).transpose()
    }

    /// Every card of a deck, in due order.
    pub fn cards_for_deck(&self, deck_id: DeckId) -> StoreResult<Vec<Card>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE deck_id = ?1 ORDER BY next_review_at ASC, id ASC"
        ))?;
        let rows = stmt
            .query_map(params![deck_id.to_string()], CardRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(CardRow::into_card).collect()
    }

    /// Every card across all decks, in due order.
    pub fn all_cards(&self) -> StoreResult<Vec<Card>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CARD_COLUMNS} FROM cards ORDER BY next_review_at ASC, id ASC"
        ))?;
        let rows = stmt
            .query_map([], CardRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(CardRow::into_card).collect()
    }
}

impl CardStore for SqliteCardStore {
    fn fetch_due(&self, deck_id: DeckId, as_of: DateTime<Utc>) -> StoreResult<Vec<Card>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CARD_COLUMNS}
             FROM cards
             WHERE deck_id = ?1 AND next_review_at <= ?2
             ORDER BY next_review_at ASC, id ASC"
        ))?;
        let rows = stmt
            .query_map(
                params![deck_id.to_string(), as_of.timestamp_millis()],
                CardRow::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(%deck_id, due = rows.len(), "fetched due cards");
        rows.into_iter().map(CardRow::into_card).collect()
    }

    fn commit_review(&self, commit: &ReviewCommit) -> StoreResult<()> {
        let mut conn = self.lock()?;
        // Dropping the transaction without commit rolls it back
        let tx = conn.transaction()?;
        let next_review_at = card::next_review_at(commit.reviewed_at, commit.state.interval_days);
        let updated = tx.execute(
            "UPDATE cards
             SET interval_days = ?1, ease_factor = ?2, last_reviewed_at = ?3,
                 next_review_at = ?4, review_count = review_count + 1
             WHERE id = ?5",
            params![
                commit.state.interval_days,
                commit.state.ease_factor,
                commit.reviewed_at.timestamp_millis(),
                next_review_at.timestamp_millis(),
                commit.card_id.to_string(),
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(commit.card_id));
        }
        tx.commit()?;
        debug!(
            card_id = %commit.card_id,
            interval_days = commit.state.interval_days,
            ease_factor = commit.state.ease_factor,
            "review committed"
        );
        Ok(())
    }
}

/// Raw column values, decoded into a [`Card`] outside the rusqlite closure.
struct CardRow {
    id: String,
    deck_id: String,
    front_content: String,
    back_content: String,
    interval_days: i32,
    ease_factor: f64,
    next_review_at: i64,
    last_reviewed_at: Option<i64>,
    review_count: u32,
}

impl CardRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            deck_id: row.get(1)?,
            front_content: row.get(2)?,
            back_content: row.get(3)?,
            interval_days: row.get(4)?,
            ease_factor: row.get(5)?,
            next_review_at: row.get(6)?,
            last_reviewed_at: row.get(7)?,
            review_count: row.get(8)?,
        })
    }

    fn into_card(self) -> StoreResult<Card> {
        Ok(Card {
            id: parse_uuid(&self.id)?,
            deck_id: parse_uuid(&self.deck_id)?,
            front_content: self.front_content,
            back_content: self.back_content,
            interval_days: self.interval_days,
            ease_factor: self.ease_factor,
            next_review_at: from_millis(self.next_review_at)?,
            last_reviewed_at: self.last_reviewed_at.map(from_millis).transpose()?,
            review_count: self.review_count,
        })
    }
}

/// Parses an id column; a malformed value marks the row as corrupt.
fn parse_uuid(raw: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| StoreError::Corrupt(format!("bad id {raw:?}: {e}")))
}

/// Converts a stored unix-millisecond timestamp back into a UTC time.
fn from_millis(ms: i64) -> StoreResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::Corrupt(format!("timestamp out of range: {ms}")))
}
