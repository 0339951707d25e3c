//! A study card as the scheduler sees it: opaque content plus the
//! scheduling fields that the interval model reads and the store persists.
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::interval::{DEFAULT_EASE, MIN_INTERVAL};

pub type CardId = Uuid;
pub type DeckId = Uuid;

/// The pair of fields the interval model maps from and to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchedulingState {
    pub interval_days: i32,
    pub ease_factor: f64,
}

impl Default for SchedulingState {
    fn default() -> Self {
        Self {
            interval_days: MIN_INTERVAL,
            ease_factor: DEFAULT_EASE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub deck_id: DeckId,
    pub front_content: String,
    pub back_content: String,
    pub interval_days: i32,
    pub ease_factor: f64,
    pub next_review_at: DateTime<Utc>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub review_count: u32,
}

impl Card {
    /// A freshly created card: interval 1, ease 2.5, due immediately.
    pub fn new(
        deck_id: DeckId,
        front_content: impl Into<String>,
        back_content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let state = SchedulingState::default();
        Self {
            id: Uuid::new_v4(),
            deck_id,
            front_content: front_content.into(),
            back_content: back_content.into(),
            interval_days: state.interval_days,
            ease_factor: state.ease_factor,
            next_review_at: created_at,
            last_reviewed_at: None,
            review_count: 0,
        }
    }

    pub fn scheduling_state(&self) -> SchedulingState {
        SchedulingState {
            interval_days: self.interval_days,
            ease_factor: self.ease_factor,
        }
    }

    /// Mirrors what the store does on commit, for in-memory copies.
    pub fn apply_review(&mut self, state: SchedulingState, reviewed_at: DateTime<Utc>) {
        self.interval_days = state.interval_days;
        self.ease_factor = state.ease_factor;
        self.last_reviewed_at = Some(reviewed_at);
        self.next_review_at = next_review_at(reviewed_at, state.interval_days);
        self.review_count += 1;
    }
}

pub fn next_review_at(reviewed_at: DateTime<Utc>, interval_days: i32) -> DateTime<Utc> {
    reviewed_at + Duration::days(i64::from(interval_days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_card_defaults() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let card = Card::new(Uuid::new_v4(), "cześć", "hello", created);

        assert_eq!(card.interval_days, 1);
        assert_eq!(card.ease_factor, 2.5);
        assert_eq!(card.next_review_at, created);
        assert_eq!(card.last_reviewed_at, None);
        assert_eq!(card.review_count, 0);
    }

    #[test]
    fn test_apply_review_sets_next_review_from_reviewed_at() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let reviewed = Utc.with_ymd_and_hms(2024, 3, 4, 18, 30, 0).unwrap();
        let mut card = Card::new(Uuid::new_v4(), "dziękuję", "thank you", created);

        card.apply_review(
            SchedulingState {
                interval_days: 3,
                ease_factor: 2.4,
            },
            reviewed,
        );

        assert_eq!(card.last_reviewed_at, Some(reviewed));
        assert_eq!(card.next_review_at, reviewed + Duration::days(3));
        assert_eq!(card.review_count, 1);
        assert_eq!(card.scheduling_state().interval_days, 3);
    }
}
