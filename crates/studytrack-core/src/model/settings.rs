//! User-tunable settings and streak bookkeeping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ExamType, Subject};

/// Daily question target, exam-independent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuestionGoal {
    pub daily: u32,
}

impl Default for QuestionGoal {
    fn default() -> Self {
        Self { daily: 80 }
    }
}

/// Thresholds a study day must clear to credit the streak.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSettings {
    pub min_study_hours: f64,
    pub min_questions: u32,
}

impl Default for StreakSettings {
    fn default() -> Self {
        Self {
            min_study_hours: 10.0,
            min_questions: 80,
        }
    }
}

/// Exam profile plus display preferences.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExamSettings {
    #[serde(default)]
    pub exam_type: ExamType,
    #[serde(default)]
    pub streak_settings: StreakSettings,
    /// User overrides for subject display labels, keyed by subject tag.
    #[serde(default)]
    pub subject_names: BTreeMap<String, String>,
}

impl ExamSettings {
    pub fn for_exam(exam_type: ExamType) -> Self {
        Self {
            exam_type,
            ..Self::default()
        }
    }

    /// Display label for a subject: user override, else capitalized tag.
    pub fn display_name(&self, subject: Subject) -> String {
        self.subject_names
            .get(subject.tag())
            .cloned()
            .unwrap_or_else(|| subject.default_display_name())
    }
}

/// Consecutive qualifying study days.
///
/// `last_study_date` is a study-day label (`%Y-%m-%d`), not a timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakData {
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(default)]
    pub last_study_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_run() {
        assert_eq!(QuestionGoal::default().daily, 80);
        let settings = ExamSettings::default();
        assert_eq!(settings.exam_type, ExamType::Jee);
        assert_eq!(settings.streak_settings.min_questions, 80);
        assert_eq!(settings.streak_settings.min_study_hours, 10.0);
        assert_eq!(StreakData::default().current_streak, 0);
    }

    #[test]
    fn display_name_falls_back_to_capitalized_tag() {
        let mut settings = ExamSettings::default();
        assert_eq!(settings.display_name(Subject::Physics), "Physics");
        settings
            .subject_names
            .insert("physics".into(), "Physics (Mains)".into());
        assert_eq!(settings.display_name(Subject::Physics), "Physics (Mains)");
    }

    #[test]
    fn settings_tolerate_missing_fields() {
        let settings: ExamSettings = serde_json::from_str(r#"{"examType": "NEET"}"#).unwrap();
        assert_eq!(settings.exam_type, ExamType::Neet);
        assert_eq!(settings.streak_settings.min_questions, 80);
    }
}
