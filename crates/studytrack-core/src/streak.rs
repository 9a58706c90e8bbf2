//! Daily streak evaluation.
//!
//! A streak counts consecutive study days that cleared both thresholds
//! (minimum hours and minimum questions). Evaluation is pure: it takes
//! the previous streak state plus today's aggregate and returns the next
//! state, so callers can re-run it on every change without side effects.

use chrono::{Duration, NaiveDateTime};

use crate::clock::{parse_wall_clock, study_day_label, study_days_between};
use crate::model::{StreakData, StreakSettings};

/// Re-evaluate the streak as of `now`.
///
/// Rules, in order:
/// 1. A fully skipped study day (gap of more than one window since the
///    last credited day) resets the streak immediately; crediting is not
///    attempted in the same cycle.
/// 2. When today's thresholds are met and today is not yet credited, the
///    streak extends if yesterday was the last credited day, otherwise
///    restarts at 1. `longest_streak` never decreases.
///
/// The `last_study_date` guard makes crediting idempotent within one
/// study day.
pub fn evaluate_streak(
    streak: &StreakData,
    total_study_hours: f64,
    total_questions: u32,
    settings: &StreakSettings,
    now: NaiveDateTime,
) -> StreakData {
    let today = study_day_label(now);
    let met_requirements = total_study_hours >= settings.min_study_hours
        && total_questions >= settings.min_questions;

    if let Some(last) = streak.last_study_date.as_deref() {
        if let Some(last_instant) = parse_wall_clock(last) {
            if study_days_between(last_instant, now) > 1 {
                return StreakData {
                    current_streak: 0,
                    longest_streak: streak.longest_streak,
                    last_study_date: None,
                };
            }
        }
    }

    if met_requirements && streak.last_study_date.as_deref() != Some(today.as_str()) {
        let yesterday = study_day_label(now - Duration::days(1));
        let current = if streak.last_study_date.as_deref() == Some(yesterday.as_str()) {
            streak.current_streak + 1
        } else {
            1
        };
        return StreakData {
            current_streak: current,
            longest_streak: streak.longest_streak.max(current),
            last_study_date: Some(today),
        };
    }

    streak.clone()
}
