//! # Studytrack Core Library
//!
//! Core business logic for the studytrack study tracker. All operations
//! are available through a standalone CLI binary; any GUI shell is a thin
//! layer over the same library.
//!
//! ## Architecture
//!
//! - **Study-day clock**: pure window math with a 4:30 AM rollover, so a
//!   late-night session counts toward the day it started
//! - **Timer engine**: per-subject wall-clock state machines; the caller
//!   injects `now` and re-reads projections on its own cadence
//! - **Aggregation**: today's per-subject stats re-derived from scratch
//!   on every change (completed sessions + live timer projections)
//! - **Streak engine**: consecutive qualifying study days against
//!   configurable hour/question thresholds
//! - **Storage**: SQLite-backed local kv store and TOML configuration
//! - **Sync**: optional per-user remote store with one-shot migration on
//!   sign-in and debounced/periodic full-document pushes
//!
//! ## Key Components
//!
//! - [`StudySession`]: top-level controller tying everything together
//! - [`TimerEngine`]: per-subject timer state machine
//! - [`LocalStore`] / [`Config`]: local persistence
//! - [`RemoteStore`]: remote persistence seam (REST client + test fakes)

pub mod bundle;
pub mod clock;
pub mod error;
pub mod model;
pub mod session;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod sync;
pub mod timer;

pub use bundle::StateBundle;
pub use error::{CoreError, Result, StorageError, SyncError, ValidationError};
pub use model::{
    ExamSettings, ExamType, Priority, QuestionGoal, StreakData, StreakSettings, Subject,
    SubjectResult, Task, TestKind, TestResult, TimeLog,
};
pub use session::StudySession;
pub use stats::{compute_today_stats, TodayStats};
pub use storage::{Config, LocalStore, RemoteConfig};
pub use streak::evaluate_streak;
pub use sync::{RemoteRecord, RemoteStore, RestRemote, SignInOutcome, SyncPhase};
pub use timer::{SubjectTimer, TimerEngine};
