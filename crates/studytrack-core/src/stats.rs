//! Today's per-subject aggregation.
//!
//! Re-derived from scratch on every state change: completed sessions
//! whose start falls inside the current study-day window, plus the live
//! projection of any running timers (which have not produced a log yet,
//! so nothing is double counted). Pure and idempotent given identical
//! inputs.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::clock::{study_day_label, within_study_day};
use crate::model::{ExamSettings, Subject, TimeLog};
use crate::timer::TimerEngine;

/// Aggregate for one study day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    /// Label of the window these stats cover.
    pub study_day: String,
    /// Seconds per subject, seeded at 0 for every profile subject.
    pub time_by_subject: BTreeMap<Subject, u64>,
    pub questions_by_subject: BTreeMap<Subject, u32>,
    /// Seconds across all subjects, classes included.
    pub total_study_time: u64,
    /// Questions across all subjects except classes.
    pub total_questions: u32,
}

impl TodayStats {
    pub fn total_study_hours(&self) -> f64 {
        self.total_study_time as f64 / 3600.0
    }
}

/// Compute today's aggregate as of `now`.
pub fn compute_today_stats(
    logs: &[TimeLog],
    timers: &TimerEngine,
    settings: &ExamSettings,
    now: NaiveDateTime,
) -> TodayStats {
    let subjects = settings.exam_type.subjects();

    let mut time_by_subject: BTreeMap<Subject, u64> =
        subjects.iter().map(|&s| (s, 0)).collect();
    let mut questions_by_subject: BTreeMap<Subject, u32> =
        subjects.iter().map(|&s| (s, 0)).collect();

    for log in logs {
        if !within_study_day(log.start_time, now) {
            continue;
        }
        // Logs for subjects outside the profile are kept in storage but
        // excluded from the day's totals.
        if let Some(time) = time_by_subject.get_mut(&log.subject) {
            *time += log.duration;
            *questions_by_subject.entry(log.subject).or_default() += log.question_count;
        }
    }

    for (&subject, timer) in timers.timers() {
        if !timer.is_running {
            continue;
        }
        if let Some(time) = time_by_subject.get_mut(&subject) {
            *time += timer.projected_elapsed(now);
            *questions_by_subject.entry(subject).or_default() += timer.question_count;
        }
    }

    let total_study_time = time_by_subject.values().sum();
    let total_questions = questions_by_subject
        .iter()
        .filter(|(s, _)| s.counts_questions())
        .map(|(_, &q)| q)
        .sum();

    TodayStats {
        study_day: study_day_label(now),
        time_by_subject,
        questions_by_subject,
        total_study_time,
        total_questions,
    }
}
