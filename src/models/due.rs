//! Due selection: which cards are eligible for review at a given instant,
//! longest-overdue first.
use chrono::{DateTime, Utc};

use super::card::{Card, DeckId};

pub fn is_due(card: &Card, as_of: DateTime<Utc>) -> bool {
    card.next_review_at <= as_of
}

/// Keeps the cards of `deck_id` with `next_review_at <= as_of`, ordered by
/// `next_review_at` ascending with ties broken by card id.
pub fn select_due<I>(cards: I, deck_id: DeckId, as_of: DateTime<Utc>) -> Vec<Card>
where
    I: IntoIterator<Item = Card>,
{
    let mut due: Vec<Card> = cards
        .into_iter()
        .filter(|card| card.deck_id == deck_id && is_due(card, as_of))
        .collect();
    sort_due(&mut due);
    due
}

pub fn sort_due(cards: &mut [Card]) {
    cards.sort_by(|a, b| {
        a.next_review_at
            .cmp(&b.next_review_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
