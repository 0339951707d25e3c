pub mod card;
pub mod deck;
pub mod due;
pub mod interval;
pub mod outcome;
pub mod session;
pub mod stats;

pub use card::{Card, CardId, DeckId, SchedulingState};
pub use deck::Deck;
pub use outcome::ReviewOutcome;
pub use session::{ReviewSession, SessionProgress, SessionState, Submission};
