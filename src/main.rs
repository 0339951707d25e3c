use spaced_review::*;

use chrono::Local;
use config::ReviewConfig;
use models::interval::{format_interval, preview};
use models::stats::{deck_stats, due_within_day, forecast};
use models::{Deck, Submission};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

const FORECAST_DAYS: usize = 5;

fn main() -> Result<(), Box<dyn Error>> {
    let config = ReviewConfig::from_env()?;
    logging::init_tracing(&config.log_level);

    let store = Arc::new(SqliteCardStore::open(&config.database_path)?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    if store.list_decks()?.is_empty() {
        let deck = store.create_deck("Polish Vocabulary")?;
        for (front, back) in [("cześć", "hello"), ("dziękuję", "thank you"), ("proszę", "please")] {
            store.add_card(deck.id, front, back, clock.now())?;
        }
        println!("Sample data created!");
    }

    let decks = store.list_decks()?;
    println!("Loaded {} decks from database", decks.len());
    for deck in &decks {
        let stats = deck_stats(&store.cards_for_deck(deck.id)?, clock.now(), &Local);
        println!(
            "  - {} ({} cards, {} reviewed, {} due now, {} due today)",
            deck.title, stats.total_cards, stats.reviewed_cards, stats.due_now, stats.due_today
        );
    }

    println!(
        "Cards scheduled for today across all decks: {}",
        due_within_day(&store.all_cards()?, clock.now(), &Local)
    );

    let Some(deck) = pick_deck(&decks, config.deck.as_deref()) else {
        println!("No deck to review.");
        return Ok(());
    };

    println!("Upcoming reviews for '{}':", deck.title);
    for day in forecast(&store.cards_for_deck(deck.id)?, clock.now(), &Local, FORECAST_DAYS) {
        println!("  {}: {}", day.date.format("%b %d"), day.cards);
    }

    let scheduler = Scheduler::new(store.clone());
    let mut session = scheduler.start_session(deck.id, clock);
    run_session(&mut session)?;

    let progress = session.progress();
    println!(
        "Reviewed {} of {} cards (forgot {}, struggled {}, easy {}).",
        progress.reviewed,
        progress.total,
        progress.outcomes.forgot,
        progress.outcomes.struggled,
        progress.outcomes.easy
    );
    Ok(())
}

fn pick_deck<'a>(decks: &'a [Deck], title: Option<&str>) -> Option<&'a Deck> {
    match title {
        Some(title) => decks.iter().find(|deck| deck.title == title),
        None => decks.first(),
    }
}

fn prompt(message: &str) -> io::Result<Option<String>> {
    print!("{message} ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Drives the session from stdin until it completes or the learner quits.
fn run_session(session: &mut ReviewSession) -> io::Result<()> {
    loop {
        match session.state() {
            SessionState::Complete => {
                println!("Nothing left to review.");
                return Ok(());
            }
            SessionState::Presenting => {
                println!();
                println!("Q: {}", session.front().unwrap_or_default());
                match prompt("[Enter] show answer, [q] quit:")? {
                    Some(input) if input != "q" => {
                        if let Err(e) = session.reveal() {
                            println!("{e}");
                        }
                    }
                    _ => return Ok(()),
                }
            }
            SessionState::Error if session.current_card().is_none() => {
                println!("Could not load cards: {}", session.last_error().unwrap_or("unknown error"));
                match prompt("[r] retry, [q] quit:")?.as_deref() {
                    Some("r") => {
                        let _ = session.load();
                    }
                    _ => return Ok(()),
                }
            }
            SessionState::AwaitingOutcome | SessionState::Error => {
                let Some(card) = session.current_card().cloned() else {
                    return Ok(());
                };
                if let Some(error) = session.last_error() {
                    println!("Saving failed: {error}. Choose again to retry.");
                }
                println!("A: {}", card.back_content);
                let labels: Vec<String> = preview(card.scheduling_state())
                    .iter()
                    .enumerate()
                    .map(|(i, (outcome, next))| {
                        format!("[{}] {} ({})", i + 1, outcome, format_interval(next.interval_days))
                    })
                    .collect();

                let Some(input) = prompt(&format!("{}, [q] quit:", labels.join(" ")))? else {
                    return Ok(());
                };
                if input == "q" {
                    return Ok(());
                }
                let Ok(outcome) = input.parse::<ReviewOutcome>() else {
                    println!("Please answer 1, 2 or 3.");
                    continue;
                };
                match session.submit(card.id, outcome) {
                    Ok(Submission::Dropped { .. }) => println!("Card was deleted, skipping."),
                    Ok(_) => {}
                    Err(e) => println!("{e}"),
                }
            }
            SessionState::Idle | SessionState::Loaded | SessionState::Committing => {
                return Ok(());
            }
        }
    }
}
