//! SM-2 spaced repetition.
//!
//! Quality grades (0-5):
//! - 0: complete blackout
//! - 1: wrong, but the answer was recognised once shown
//! - 2: wrong, but the answer felt familiar
//! - 3: right with serious difficulty
//! - 4: right after hesitation
//! - 5: right with no hesitation

use chrono::{DateTime, Duration, SubsecRound, Utc};

use crate::models::domain::review_state::{ReviewState, MIN_EASE_FACTOR};

pub const MIN_QUALITY: i32 = 0;
pub const MAX_QUALITY: i32 = 5;
pub const PASSING_QUALITY: i32 = 3;

/// Computes the state after a review graded `quality` at `now`.
///
/// Out-of-range grades are clamped, never rejected. The ease adjustment is
/// applied on both success and failure and always starts from the previous
/// ease factor.
pub fn next_state(current: &ReviewState, quality: i32, now: DateTime<Utc>) -> ReviewState {
    let quality = quality.clamp(MIN_QUALITY, MAX_QUALITY);

    let (interval_days, repetitions) = if quality < PASSING_QUALITY {
        (1, 0)
    } else {
        let interval = match current.repetitions {
            0 => 1,
            1 => 6,
            _ => (current.interval_days as f64 * current.ease_factor).round() as u32,
        };
        (interval, current.repetitions + 1)
    };

    let now = now.trunc_subsecs(0);

    ReviewState {
        question_id: current.question_id.clone(),
        project_id: current.project_id.clone(),
        ease_factor: next_ease_factor(current.ease_factor, quality),
        interval_days,
        repetitions,
        next_review_at: now + Duration::days(interval_days as i64),
        last_reviewed_at: Some(now),
    }
}

/// EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02)), floored at 1.3 and
/// stored with two decimals.
fn next_ease_factor(ease_factor: f64, quality: i32) -> f64 {
    let distance = (MAX_QUALITY - quality) as f64;
    let updated = ease_factor + (0.1 - distance * (0.08 + distance * 0.02));
    round_to_hundredths(updated.max(MIN_EASE_FACTOR))
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
