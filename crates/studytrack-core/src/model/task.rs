use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{new_id, Subject};

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// A user-created task. Never auto-expired; lives until deleted.
///
/// Timers may hold a weak reference to a task (id + title snapshot);
/// deleting the task does not invalidate those references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub subject: Subject,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    /// Buckets the task into a study-day window ("today" vs "tomorrow").
    /// Defaults to `created_at`.
    #[serde(default)]
    pub target_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub priority: Priority,
    /// Estimated effort in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,
}

impl Task {
    pub fn new(title: impl Into<String>, subject: Subject, now: NaiveDateTime) -> Self {
        Self {
            id: new_id(now),
            title: title.into(),
            subject,
            completed: false,
            created_at: now,
            target_date: Some(now),
            priority: Priority::default(),
            estimated_time: None,
        }
    }

    /// Study-day bucketing date: explicit target date, else creation time.
    pub fn effective_target(&self) -> NaiveDateTime {
        self.target_date.unwrap_or(self.created_at)
    }
}
