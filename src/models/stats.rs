//! Deck progress figures and the upcoming-reviews forecast.
//!
//! Calendar days are taken in the caller's time zone so "due today" matches
//! the learner's day, not UTC's.
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use super::card::Card;
use super::due::is_due;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeckStats {
    pub total_cards: usize,
    /// Cards reviewed at least once.
    pub reviewed_cards: usize,
    pub due_now: usize,
    /// Due now or later during the current calendar day.
    pub due_today: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub cards: usize,
}

fn local_date<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

pub fn deck_stats<Tz: TimeZone>(cards: &[Card], as_of: DateTime<Utc>, tz: &Tz) -> DeckStats {
    let today = local_date(as_of, tz);

    cards.iter().fold(
        DeckStats {
            total_cards: cards.len(),
            ..DeckStats::default()
        },
        |mut stats, card| {
            if card.review_count > 0 {
                stats.reviewed_cards += 1;
            }
            if is_due(card, as_of) {
                stats.due_now += 1;
            }
            if local_date(card.next_review_at, tz) <= today {
                stats.due_today += 1;
            }
            stats
        },
    )
}

/// Cards whose `next_review_at` falls on `as_of`'s calendar day in `tz`.
///
/// Unlike [`DeckStats::due_today`] this leaves out cards overdue from earlier
/// days. Pass cards from any number of decks for a cross-deck count.
pub fn due_within_day<Tz: TimeZone>(cards: &[Card], as_of: DateTime<Utc>, tz: &Tz) -> usize {
    let today = local_date(as_of, tz);
    cards
        .iter()
        .filter(|card| local_date(card.next_review_at, tz) == today)
        .count()
}

/// One bucket per day starting at `as_of`'s day. Overdue cards land in the
/// first bucket; cards due after the window are left out.
pub fn forecast<Tz: TimeZone>(
    cards: &[Card],
    as_of: DateTime<Utc>,
    tz: &Tz,
    days: usize,
) -> Vec<DayForecast> {
    let today = local_date(as_of, tz);
    let mut buckets: Vec<DayForecast> = today
        .iter_days()
        .take(days)
        .map(|date| DayForecast { date, cards: 0 })
        .collect();

    for card in cards {
        let offset = (local_date(card.next_review_at, tz) - today).num_days().max(0);
        if let Some(bucket) = usize::try_from(offset)
            .ok()
            .and_then(|index| buckets.get_mut(index))
        {
            bucket.cards += 1;
        }
    }

    buckets
}
