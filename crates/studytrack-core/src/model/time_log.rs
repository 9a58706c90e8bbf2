//! Completed study sessions.
//!
//! A `TimeLog` is immutable once created except for three user-editable
//! fields: end time, question count, and notes. Older records carried
//! only a `timestamp` + `duration` pair; those are upgraded transparently
//! during deserialization, so every load path (local kv, remote record)
//! sees the modern shape.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::clock::parse_wall_clock;
use crate::error::ValidationError;

use super::{new_id, Subject};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeLog {
    pub id: String,
    pub subject: Subject,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Seconds, always `end_time - start_time`.
    pub duration: u64,
    pub question_count: u32,
    /// Weak reference to a task; the task may no longer exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TimeLog {
    /// Manual entry with an explicit interval. The session controller
    /// validates the range before calling this.
    pub fn manual(
        subject: Subject,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        question_count: u32,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: new_id(now),
            subject,
            start_time,
            end_time,
            duration: duration_secs(start_time, end_time),
            question_count,
            goal_id: None,
            goal_title: None,
            notes: None,
        }
    }

    /// Move the end time, recomputing the duration. Rejects an end at or
    /// before the start so no zero-length edit slips through.
    pub fn set_end_time(&mut self, end_time: NaiveDateTime) -> Result<(), ValidationError> {
        if end_time <= self.start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start_time,
                end: end_time,
            });
        }
        self.end_time = end_time;
        self.duration = duration_secs(self.start_time, end_time);
        Ok(())
    }
}

fn duration_secs(start: NaiveDateTime, end: NaiveDateTime) -> u64 {
    (end - start).num_seconds().max(0) as u64
}

/// Raw persisted shape, covering both the modern and the legacy format.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeLog {
    id: String,
    subject: Subject,
    #[serde(default)]
    duration: i64,
    /// Legacy end-of-session marker.
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    end_time: Option<String>,
    #[serde(default)]
    question_count: Option<u32>,
    #[serde(default)]
    goal_id: Option<String>,
    #[serde(default)]
    goal_title: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl<'de> Deserialize<'de> for TimeLog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let raw = RawTimeLog::deserialize(deserializer)?;
        let parsed_start = raw.start_time.as_deref().and_then(parse_wall_clock);
        let parsed_end = raw.end_time.as_deref().and_then(parse_wall_clock);

        let (start_time, end_time) = match (parsed_start, parsed_end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                // Legacy record: timestamp marks the end, duration walks back.
                let end = raw
                    .timestamp
                    .as_deref()
                    .and_then(parse_wall_clock)
                    .ok_or_else(|| {
                        D::Error::custom(format!("time log {} has no usable timestamps", raw.id))
                    })?;
                (end - chrono::Duration::seconds(raw.duration.max(0)), end)
            }
        };

        Ok(TimeLog {
            id: raw.id,
            subject: raw.subject,
            start_time,
            end_time,
            duration: duration_secs(start_time, end_time),
            question_count: raw.question_count.unwrap_or(0),
            goal_id: raw.goal_id,
            goal_title: raw.goal_title,
            notes: raw.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn manual_log_computes_duration() {
        let log = TimeLog::manual(Subject::Physics, at(10, 0), at(11, 30), 25, at(11, 30));
        assert_eq!(log.duration, 5400);
        assert_eq!(log.question_count, 25);
    }

    #[test]
    fn edit_end_time_recomputes_duration() {
        let mut log = TimeLog::manual(Subject::Chemistry, at(10, 0), at(10, 10), 0, at(10, 10));
        assert_eq!(log.duration, 600);
        log.set_end_time(at(10, 15)).unwrap();
        assert_eq!(log.duration, 900);
    }

    #[test]
    fn edit_end_time_rejects_inverted_range() {
        let mut log = TimeLog::manual(Subject::Chemistry, at(10, 0), at(10, 10), 0, at(10, 10));
        assert!(log.set_end_time(at(9, 0)).is_err());
        assert_eq!(log.duration, 600);
    }

    #[test]
    fn legacy_record_upgrades_on_read() {
        let json = r#"{
            "id": "1704103200000",
            "subject": "physics",
            "timestamp": "2024-01-01T10:00:00Z",
            "duration": 600
        }"#;
        let log: TimeLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.end_time.to_string(), "2024-01-01 10:00:00");
        assert_eq!(log.start_time.to_string(), "2024-01-01 09:50:00");
        assert_eq!(log.duration, 600);
        assert_eq!(log.question_count, 0);
    }

    #[test]
    fn modern_record_round_trips() {
        let log = TimeLog::manual(Subject::Mathematics, at(23, 0), at(23, 45), 30, at(23, 45));
        let json = serde_json::to_string(&log).unwrap();
        let back: TimeLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back.start_time, log.start_time);
        assert_eq!(back.end_time, log.end_time);
        assert_eq!(back.duration, log.duration);
    }

    #[test]
    fn unparseable_record_is_rejected() {
        let json = r#"{"id": "x", "subject": "physics", "duration": 60}"#;
        assert!(serde_json::from_str::<TimeLog>(json).is_err());
    }
}
