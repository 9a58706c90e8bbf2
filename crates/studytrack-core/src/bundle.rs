//! The full per-user state bundle.
//!
//! One value holding everything the app persists: the same shape lives
//! under the local kv keys (one key per field) and as the single remote
//! row per user. Sync is whole-bundle replacement, never field merge.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{ExamSettings, QuestionGoal, StreakData, Subject, Task, TestResult, TimeLog};
use crate::timer::SubjectTimer;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateBundle {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub time_logs: Vec<TimeLog>,
    #[serde(default)]
    pub question_goal: QuestionGoal,
    #[serde(default)]
    pub exam_settings: ExamSettings,
    #[serde(default)]
    pub streak_data: StreakData,
    #[serde(default)]
    pub timer_states: BTreeMap<Subject, SubjectTimer>,
    #[serde(default)]
    pub test_results: Vec<TestResult>,
}

impl StateBundle {
    /// Whether there is anything worth migrating to a fresh remote row.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
            && self.time_logs.is_empty()
            && self.test_results.is_empty()
            && self.streak_data == StreakData::default()
            && self.timer_states.values().all(|t| !t.is_running)
    }
}
