//! Data model: subjects, exam profiles, and the persisted entities.

mod settings;
mod task;
mod test_result;
mod time_log;

pub use settings::{ExamSettings, QuestionGoal, StreakData, StreakSettings};
pub use task::{Priority, Task};
pub use test_result::{SubjectResult, TestKind, TestResult};
pub use time_log::TimeLog;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subject tag. The active exam profile selects which subset is in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Physics,
    Chemistry,
    Mathematics,
    Botany,
    Zoology,
    /// Lecture/coaching hours. Counted in time totals, excluded from
    /// question goals and accuracy analytics.
    Classes,
}

impl Subject {
    /// Wire/storage tag, also used as the display-name fallback key.
    pub fn tag(&self) -> &'static str {
        match self {
            Subject::Physics => "physics",
            Subject::Chemistry => "chemistry",
            Subject::Mathematics => "mathematics",
            Subject::Botany => "botany",
            Subject::Zoology => "zoology",
            Subject::Classes => "classes",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "physics" => Some(Subject::Physics),
            "chemistry" => Some(Subject::Chemistry),
            "mathematics" => Some(Subject::Mathematics),
            "botany" => Some(Subject::Botany),
            "zoology" => Some(Subject::Zoology),
            "classes" => Some(Subject::Classes),
            _ => None,
        }
    }

    /// Capitalized tag, used when no display-name override exists.
    pub fn default_display_name(&self) -> String {
        let tag = self.tag();
        let mut chars = tag.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }

    /// Whether this subject counts toward question goals.
    pub fn counts_questions(&self) -> bool {
        !matches!(self, Subject::Classes)
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Exam profile. Determines the active subject set and per-subject
/// default maximum marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExamType {
    #[default]
    #[serde(rename = "JEE")]
    Jee,
    #[serde(rename = "NEET")]
    Neet,
}

impl ExamType {
    pub fn subjects(&self) -> &'static [Subject] {
        match self {
            ExamType::Jee => &[
                Subject::Physics,
                Subject::Chemistry,
                Subject::Mathematics,
                Subject::Classes,
            ],
            ExamType::Neet => &[
                Subject::Physics,
                Subject::Chemistry,
                Subject::Botany,
                Subject::Zoology,
                Subject::Classes,
            ],
        }
    }

    /// Default maximum marks per subject in a test.
    pub fn default_max_marks(&self) -> u32 {
        match self {
            ExamType::Jee => 100,
            ExamType::Neet => 180,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "JEE" => Some(ExamType::Jee),
            "NEET" => Some(ExamType::Neet),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExamType::Jee => f.write_str("JEE"),
            ExamType::Neet => f.write_str("NEET"),
        }
    }
}

/// New entity id: millisecond prefix keeps ids creation-order sortable,
/// uuid suffix keeps them unique within the same millisecond.
pub fn new_id(now: NaiveDateTime) -> String {
    let millis = now.and_utc().timestamp_millis();
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{millis}-{}", &uuid[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn subject_tags_round_trip() {
        for s in [
            Subject::Physics,
            Subject::Chemistry,
            Subject::Mathematics,
            Subject::Botany,
            Subject::Zoology,
            Subject::Classes,
        ] {
            assert_eq!(Subject::parse(s.tag()), Some(s));
        }
        assert!(Subject::parse("history").is_none());
    }

    #[test]
    fn profiles_partition_subjects() {
        assert_eq!(ExamType::Jee.subjects().len(), 4);
        assert_eq!(ExamType::Neet.subjects().len(), 5);
        assert!(!ExamType::Jee.subjects().contains(&Subject::Botany));
        assert!(!ExamType::Neet.subjects().contains(&Subject::Mathematics));
        // Both profiles include the shared core.
        for profile in [ExamType::Jee, ExamType::Neet] {
            assert!(profile.subjects().contains(&Subject::Physics));
            assert!(profile.subjects().contains(&Subject::Classes));
        }
    }

    #[test]
    fn exam_type_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&ExamType::Jee).unwrap(), "\"JEE\"");
        assert_eq!(serde_json::to_string(&ExamType::Neet).unwrap(), "\"NEET\"");
    }

    #[test]
    fn ids_sort_by_creation_time() {
        let t1 = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let t2 = t1 + chrono::Duration::seconds(1);
        assert!(new_id(t1) < new_id(t2));
    }
}
