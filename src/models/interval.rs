//! Interval model: maps (interval, ease, outcome) to the next (interval, ease).
//!
//! - forgot: interval resets to 1 day, ease drops by 0.2
//! - struggled: interval is kept, ease drops by 0.15
//! - easy: interval grows to ceil(interval * ease), ease rises by 0.1
//!
//! Ease stays within [1.3, 2.5] and the interval within [1, 365] days.
//! The model is pure: no clock, no store.

use super::card::SchedulingState;
use super::outcome::ReviewOutcome;

pub const MIN_EASE: f64 = 1.3;
pub const MAX_EASE: f64 = 2.5;
pub const DEFAULT_EASE: f64 = MAX_EASE;
pub const MIN_INTERVAL: i32 = 1;
pub const MAX_INTERVAL: i32 = 365;

const FORGOT_EASE_PENALTY: f64 = 0.2;
const STRUGGLED_EASE_PENALTY: f64 = 0.15;
const EASY_EASE_BONUS: f64 = 0.1;

// Relative slack so a product like 10 * 1.3 = 13.000000000000002 ceils to 13.
const CEIL_RELATIVE_TOLERANCE: f64 = 1e-12;

/// Computes the scheduling state after one review.
///
/// Out-of-range inputs are clamped rather than rejected.
pub fn next_state(current_interval: i32, current_ease: f64, outcome: ReviewOutcome) -> SchedulingState {
    let interval = current_interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
    let ease = clamp_ease(current_ease);

    let (new_interval, new_ease) = match outcome {
        ReviewOutcome::Forgot => (MIN_INTERVAL, ease - FORGOT_EASE_PENALTY),
        ReviewOutcome::Struggled => (interval, ease - STRUGGLED_EASE_PENALTY),
        ReviewOutcome::Easy => {
            let product = f64::from(interval) * ease;
            let grown = (product - product * CEIL_RELATIVE_TOLERANCE).ceil() as i32;
            (grown, ease + EASY_EASE_BONUS)
        }
    };

    SchedulingState {
        interval_days: new_interval.clamp(MIN_INTERVAL, MAX_INTERVAL),
        ease_factor: clamp_ease(new_ease),
    }
}

/// The state each outcome would produce, in button order.
pub fn preview(state: SchedulingState) -> [(ReviewOutcome, SchedulingState); 3] {
    ReviewOutcome::ALL.map(|outcome| {
        (
            outcome,
            next_state(state.interval_days, state.ease_factor, outcome),
        )
    })
}

fn clamp_ease(ease: f64) -> f64 {
    if ease.is_nan() {
        return DEFAULT_EASE;
    }
    ease.clamp(MIN_EASE, MAX_EASE)
}

/// Short label for an interval in days, e.g. "3d", "2w", "4mo", "1y".
pub fn format_interval(days: i32) -> String {
    match days {
        d if d <= 0 => "now".to_string(),
        d if d < 7 => format!("{}d", d),
        d if d < 30 => format!("{}w", d / 7),
        d if d < 365 => format!("{}mo", d / 30),
        d => format!("{}y", d / 365),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_easy_on_fresh_card() {
        let next = next_state(1, 2.5, ReviewOutcome::Easy);
        assert_eq!(next.interval_days, 3);
        assert!(approx(next.ease_factor, 2.5));
    }

    #[test]
    fn test_forgot_resets_interval() {
        let next = next_state(10, 2.0, ReviewOutcome::Forgot);
        assert_eq!(next.interval_days, 1);
        assert!(approx(next.ease_factor, 1.8));
    }

    #[test]
    fn test_struggled_keeps_interval_and_floors_ease() {
        let next = next_state(5, 1.35, ReviewOutcome::Struggled);
        assert_eq!(next.interval_days, 5);
        assert!(approx(next.ease_factor, 1.3));
    }

    #[test]
    fn test_easy_product_is_not_overshot_by_float_error() {
        let next = next_state(10, 1.3, ReviewOutcome::Easy);
        assert_eq!(next.interval_days, 13);
        assert!(approx(next.ease_factor, 1.4));
    }

    #[test]
    fn test_ease_is_not_rounded() {
        let next = next_state(4, 2.004, ReviewOutcome::Forgot);
        assert!(approx(next.ease_factor, 1.804));

        let next = next_state(3, 1.456, ReviewOutcome::Struggled);
        assert!(approx(next.ease_factor, 1.306));

        let next = next_state(2, 1.999, ReviewOutcome::Easy);
        assert!(approx(next.ease_factor, 2.099));
    }

    #[test]
    fn test_easy_ceils_real_fractions() {
        let next = next_state(1, 2.0000000005, ReviewOutcome::Easy);
        assert_eq!(next.interval_days, 3);

        let next = next_state(7, 1.3, ReviewOutcome::Easy);
        assert_eq!(next.interval_days, 10);
    }

    #[test]
    fn test_easy_caps_at_a_year() {
        let next = next_state(200, 2.5, ReviewOutcome::Easy);
        assert_eq!(next.interval_days, MAX_INTERVAL);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let next = next_state(0, 9.0, ReviewOutcome::Struggled);
        assert_eq!(next.interval_days, 1);
        assert!(approx(next.ease_factor, 2.35));

        let next = next_state(1000, 0.5, ReviewOutcome::Struggled);
        assert_eq!(next.interval_days, MAX_INTERVAL);
        assert!(approx(next.ease_factor, MIN_EASE));

        let next = next_state(4, f64::NAN, ReviewOutcome::Forgot);
        assert!(approx(next.ease_factor, 2.3));
    }

    #[test]
    fn test_bounds_hold_for_all_inputs() {
        for interval in [1, 2, 3, 7, 30, 100, 180, 364, 365] {
            for step in 0..=12 {
                let ease = MIN_EASE + f64::from(step) * 0.1;
                for outcome in ReviewOutcome::ALL {
                    let next = next_state(interval, ease, outcome);
                    assert!((MIN_INTERVAL..=MAX_INTERVAL).contains(&next.interval_days));
                    assert!(next.ease_factor >= MIN_EASE && next.ease_factor <= MAX_EASE);

                    match outcome {
                        ReviewOutcome::Forgot => assert_eq!(next.interval_days, 1),
                        ReviewOutcome::Struggled => assert_eq!(next.interval_days, interval),
                        ReviewOutcome::Easy => assert!(next.interval_days >= interval),
                    }
                }
            }
        }
    }

    #[test]
    fn test_preview_lists_outcomes_in_button_order() {
        let previews = preview(SchedulingState {
            interval_days: 4,
            ease_factor: 2.0,
        });

        assert_eq!(previews[0].0, ReviewOutcome::Forgot);
        assert_eq!(previews[0].1.interval_days, 1);
        assert_eq!(previews[1].1.interval_days, 4);
        assert_eq!(previews[2].1.interval_days, 8);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(6), "6d");
        assert_eq!(format_interval(14), "2w");
        assert_eq!(format_interval(95), "3mo");
        assert_eq!(format_interval(365), "1y");
    }
}
