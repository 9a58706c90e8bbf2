//! Per-subject timer state machine.
//!
//! Each subject in the active exam profile owns one timer, idle or
//! running; different subjects may run concurrently. The engine operates
//! on wall-clock instants handed in by the caller -- no internal threads,
//! the UI layer re-reads projections on its own cadence while anything is
//! running.
//!
//! ```text
//! Idle --start--> Running --pause--> Idle (+ one TimeLog emitted)
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::{new_id, ExamType, Subject, TimeLog};

/// Persisted timer state for one subject.
///
/// `elapsed_secs` is authoritative only while stopped; while running it is
/// a cached projection and the truth lives in `start_time`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectTimer {
    pub is_running: bool,
    #[serde(default)]
    pub start_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub elapsed_secs: u64,
    #[serde(default)]
    pub question_count: u32,
    /// Weak reference to a task being worked on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_title: Option<String>,
}

impl SubjectTimer {
    /// Elapsed seconds as of `now`: live projection while running, the
    /// stored value otherwise. Read-only, mutates nothing.
    pub fn projected_elapsed(&self, now: NaiveDateTime) -> u64 {
        match (self.is_running, self.start_time) {
            (true, Some(start)) => (now - start).num_seconds().max(0) as u64,
            _ => self.elapsed_secs,
        }
    }
}

/// Timer map for the active exam profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    exam_type: ExamType,
    timers: BTreeMap<Subject, SubjectTimer>,
}

impl TimerEngine {
    pub fn new(exam_type: ExamType) -> Self {
        let timers = exam_type
            .subjects()
            .iter()
            .map(|&s| (s, SubjectTimer::default()))
            .collect();
        Self { exam_type, timers }
    }

    /// Rebuild from persisted per-subject states, dropping subjects that
    /// are not in the profile and defaulting missing ones.
    pub fn from_states(exam_type: ExamType, states: BTreeMap<Subject, SubjectTimer>) -> Self {
        let mut engine = Self::new(exam_type);
        for (subject, state) in states {
            if engine.timers.contains_key(&subject) {
                engine.timers.insert(subject, state);
            }
        }
        engine
    }

    pub fn exam_type(&self) -> ExamType {
        self.exam_type
    }

    pub fn timer(&self, subject: Subject) -> Option<&SubjectTimer> {
        self.timers.get(&subject)
    }

    pub fn timers(&self) -> &BTreeMap<Subject, SubjectTimer> {
        &self.timers
    }

    pub fn any_running(&self) -> bool {
        self.timers.values().any(|t| t.is_running)
    }

    /// Start the subject's timer. Legal only from idle; returns false and
    /// leaves everything untouched when already running or the subject is
    /// outside the profile.
    ///
    /// A stale `question_count` from a prior aborted run is deliberately
    /// not cleared here; `pause` is the only reset point.
    pub fn start(
        &mut self,
        subject: Subject,
        now: NaiveDateTime,
        goal_id: Option<String>,
        goal_title: Option<String>,
    ) -> bool {
        let Some(timer) = self.timers.get_mut(&subject) else {
            return false;
        };
        if timer.is_running {
            return false;
        }
        timer.is_running = true;
        timer.start_time = Some(now);
        timer.elapsed_secs = 0;
        timer.goal_id = goal_id;
        timer.goal_title = goal_title;
        true
    }

    /// Stop the subject's timer, emitting exactly one completed session
    /// and resetting the timer to defaults (question count and goal
    /// reference cleared). Returns None when the timer was not running.
    ///
    /// This is the sole path from live timing to a `TimeLog`; manual
    /// entries are constructed directly with explicit start/end.
    pub fn pause(&mut self, subject: Subject, now: NaiveDateTime) -> Option<TimeLog> {
        let timer = self.timers.get_mut(&subject)?;
        if !timer.is_running {
            return None;
        }
        let start_time = timer.start_time.unwrap_or(now);
        let duration = (now - start_time).num_seconds().max(0) as u64;
        let log = TimeLog {
            id: new_id(now),
            subject,
            start_time,
            end_time: now,
            duration,
            question_count: timer.question_count,
            goal_id: timer.goal_id.take(),
            goal_title: timer.goal_title.take(),
            notes: None,
        };
        *timer = SubjectTimer::default();
        Some(log)
    }

    pub fn increment_questions(&mut self, subject: Subject) {
        if let Some(timer) = self.timers.get_mut(&subject) {
            timer.question_count += 1;
        }
    }

    /// Decrement floors at zero.
    pub fn decrement_questions(&mut self, subject: Subject) {
        if let Some(timer) = self.timers.get_mut(&subject) {
            timer.question_count = timer.question_count.saturating_sub(1);
        }
    }

    pub fn set_question_count(&mut self, subject: Subject, count: u32) {
        if let Some(timer) = self.timers.get_mut(&subject) {
            timer.question_count = count;
        }
    }

    /// Switch exam profiles, carrying over state for subjects present in
    /// both sets and defaulting the rest. Subjects leaving the set are
    /// discarded along with any running timer they held.
    pub fn apply_profile(&mut self, exam_type: ExamType) {
        if exam_type == self.exam_type {
            return;
        }
        let old = std::mem::take(&mut self.timers);
        let mut next = Self::new(exam_type);
        for (subject, state) in old {
            if next.timers.contains_key(&subject) {
                next.timers.insert(subject, state);
            }
        }
        *self = next;
    }

    /// Viewed-subject fallback after a profile switch.
    pub fn fallback_subject(&self, current: Subject) -> Subject {
        if self.timers.contains_key(&current) {
            current
        } else {
            Subject::Physics
        }
    }
}
