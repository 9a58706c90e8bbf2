//! Recorded mock/quiz test results with derived scoring.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{new_id, Subject};

/// Kind of test taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    Weekly,
    Monthly,
    Quiz,
    Mock,
}

impl TestKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "weekly" => Some(TestKind::Weekly),
            "monthly" => Some(TestKind::Monthly),
            "quiz" => Some(TestKind::Quiz),
            "mock" => Some(TestKind::Mock),
            _ => None,
        }
    }
}

/// Per-subject outcome inside a test.
///
/// `incorrect` is derived, never entered: `max(0, attempted - correct)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResult {
    pub attempted: u32,
    pub correct: u32,
    #[serde(default)]
    pub incorrect: u32,
    pub marks: i32,
    pub total_marks: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub id: String,
    pub exam_type: TestKind,
    pub test_name: String,
    pub date: NaiveDateTime,
    /// Test duration in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    pub subjects: BTreeMap<Subject, SubjectResult>,
    #[serde(default)]
    pub total_marks: i32,
    #[serde(default)]
    pub max_marks: u32,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TestResult {
    pub fn new(
        exam_type: TestKind,
        test_name: impl Into<String>,
        date: NaiveDateTime,
        subjects: BTreeMap<Subject, SubjectResult>,
        now: NaiveDateTime,
    ) -> Self {
        let mut result = Self {
            id: new_id(now),
            exam_type,
            test_name: test_name.into(),
            date,
            duration: None,
            subjects,
            total_marks: 0,
            max_marks: 0,
            percentage: 0.0,
            rank: None,
            notes: None,
        };
        result.recompute();
        result
    }

    /// Re-derive every computed field from the per-subject entries.
    /// Called on every add/edit so the derived fields never drift.
    pub fn recompute(&mut self) {
        let mut total: i32 = 0;
        let mut max: u32 = 0;
        for entry in self.subjects.values_mut() {
            entry.incorrect = entry.attempted.saturating_sub(entry.correct);
            total += entry.marks;
            max += entry.total_marks;
        }
        self.total_marks = total;
        self.max_marks = max;
        self.percentage = if max == 0 {
            0.0
        } else {
            f64::from(total) / f64::from(max) * 100.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn entry(attempted: u32, correct: u32, marks: i32, total: u32) -> SubjectResult {
        SubjectResult {
            attempted,
            correct,
            incorrect: 999, // Stale on purpose; recompute must overwrite.
            marks,
            total_marks: total,
        }
    }

    #[test]
    fn recompute_derives_everything() {
        let mut subjects = BTreeMap::new();
        subjects.insert(Subject::Physics, entry(25, 20, 72, 100));
        subjects.insert(Subject::Chemistry, entry(28, 22, 80, 100));
        subjects.insert(Subject::Mathematics, entry(18, 10, 28, 100));
        let result = TestResult::new(TestKind::Mock, "AITS Mock 4", now(), subjects, now());

        assert_eq!(result.total_marks, 180);
        assert_eq!(result.max_marks, 300);
        assert!((result.percentage - 60.0).abs() < 1e-9);
        assert_eq!(result.subjects[&Subject::Physics].incorrect, 5);
        assert_eq!(result.subjects[&Subject::Mathematics].incorrect, 8);
    }

    #[test]
    fn incorrect_never_negative() {
        let mut subjects = BTreeMap::new();
        // Correct > attempted can only come from bad input; floor at 0.
        subjects.insert(Subject::Physics, entry(5, 9, 20, 100));
        let result = TestResult::new(TestKind::Quiz, "Topic quiz", now(), subjects, now());
        assert_eq!(result.subjects[&Subject::Physics].incorrect, 0);
    }

    #[test]
    fn empty_test_scores_zero_percent() {
        let result = TestResult::new(TestKind::Weekly, "Empty", now(), BTreeMap::new(), now());
        assert_eq!(result.max_marks, 0);
        assert_eq!(result.percentage, 0.0);
    }

    #[test]
    fn negative_marks_supported() {
        let mut subjects = BTreeMap::new();
        subjects.insert(Subject::Physics, entry(30, 5, -10, 100));
        let result = TestResult::new(TestKind::Mock, "Rough day", now(), subjects, now());
        assert_eq!(result.total_marks, -10);
        assert!(result.percentage < 0.0);
    }
}
