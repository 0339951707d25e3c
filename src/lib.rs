pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use database::{CardStore, SqliteCardStore, StoreError};
pub use error::{SessionError, SessionResult};
pub use models::{Card, CardId, DeckId, ReviewOutcome, ReviewSession, SessionState};
pub use scheduler::Scheduler;
