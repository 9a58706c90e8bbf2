//! Top-level session controller.
//!
//! `StudySession` owns the state bundle and every engine, and is the only
//! mutation path: user action -> timer/state change -> today's aggregate
//! re-derived -> streak re-evaluated -> persisted locally or scheduled
//! for a remote push, depending on the sync phase. It replaces the
//! ambient singletons of a UI shell with one explicit container, so tests
//! inject an in-memory store, a fake remote, and a fixed clock.
//!
//! All mutation runs synchronously on the caller's thread; the only
//! suspension points are the remote calls inside `push`.

use chrono::{NaiveDateTime, Utc};

use crate::bundle::StateBundle;
use crate::error::{CoreError, Result, SyncError, ValidationError};
use crate::model::{
    ExamSettings, QuestionGoal, StreakData, Subject, Task, TestResult, TimeLog,
};
use crate::stats::{compute_today_stats, TodayStats};
use crate::storage::LocalStore;
use crate::streak::evaluate_streak;
use crate::sync::reconciler::{self, SignInOutcome, SyncPhase, SyncSchedule};
use crate::sync::remote::{RemoteRecord, RemoteStore};
use crate::timer::TimerEngine;

pub struct StudySession {
    bundle: StateBundle,
    timers: TimerEngine,
    active_subject: Subject,
    store: LocalStore,
    remote: Option<Box<dyn RemoteStore>>,
    user_id: Option<String>,
    phase: SyncPhase,
    schedule: SyncSchedule,
    last_sync_at: Option<chrono::DateTime<Utc>>,
}

impl StudySession {
    /// Load a session from the local store. Missing or malformed keys
    /// degrade to defaults inside the store; nothing here is fatal.
    pub fn open(store: LocalStore) -> Result<Self> {
        let bundle = store.load_bundle()?;
        let timers = TimerEngine::from_states(
            bundle.exam_settings.exam_type,
            bundle.timer_states.clone(),
        );
        Ok(Self {
            bundle,
            timers,
            active_subject: Subject::Physics,
            store,
            remote: None,
            user_id: None,
            phase: SyncPhase::Anonymous,
            schedule: SyncSchedule::new(),
            last_sync_at: None,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn bundle(&self) -> &StateBundle {
        &self.bundle
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn timers(&self) -> &TimerEngine {
        &self.timers
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn streak(&self) -> &StreakData {
        &self.bundle.streak_data
    }

    pub fn question_goal(&self) -> QuestionGoal {
        self.bundle.question_goal
    }

    pub fn exam_settings(&self) -> &ExamSettings {
        &self.bundle.exam_settings
    }

    pub fn active_subject(&self) -> Subject {
        self.active_subject
    }

    pub fn last_sync_at(&self) -> Option<chrono::DateTime<Utc>> {
        self.last_sync_at
    }

    /// Whether the caller should keep a 1 s refresh tick armed.
    pub fn any_timer_running(&self) -> bool {
        self.timers.any_running()
    }

    pub fn today_stats(&self, now: NaiveDateTime) -> TodayStats {
        compute_today_stats(
            &self.bundle.time_logs,
            &self.timers,
            &self.bundle.exam_settings,
            now,
        )
    }

    // ── Timer operations ─────────────────────────────────────────────

    pub fn set_active_subject(&mut self, subject: Subject) -> Result<()> {
        self.require_subject(subject)?;
        self.active_subject = subject;
        Ok(())
    }

    pub fn start_timer(
        &mut self,
        subject: Subject,
        now: NaiveDateTime,
        goal_id: Option<String>,
        goal_title: Option<String>,
    ) -> Result<()> {
        self.require_subject(subject)?;
        if !self.timers.start(subject, now, goal_id, goal_title) {
            return Err(ValidationError::IllegalTimerTransition {
                subject: subject.to_string(),
                state: "already running".into(),
            }
            .into());
        }
        self.after_mutation(now);
        Ok(())
    }

    pub fn pause_timer(&mut self, subject: Subject, now: NaiveDateTime) -> Result<TimeLog> {
        self.require_subject(subject)?;
        let log = self.timers.pause(subject, now).ok_or_else(|| {
            CoreError::from(ValidationError::IllegalTimerTransition {
                subject: subject.to_string(),
                state: "not running".into(),
            })
        })?;
        self.bundle.time_logs.push(log.clone());
        self.after_mutation(now);
        Ok(log)
    }

    pub fn increment_questions(&mut self, subject: Subject, now: NaiveDateTime) -> Result<()> {
        self.require_subject(subject)?;
        self.timers.increment_questions(subject);
        self.after_mutation(now);
        Ok(())
    }

    pub fn decrement_questions(&mut self, subject: Subject, now: NaiveDateTime) -> Result<()> {
        self.require_subject(subject)?;
        self.timers.decrement_questions(subject);
        self.after_mutation(now);
        Ok(())
    }

    pub fn set_question_count(
        &mut self,
        subject: Subject,
        count: u32,
        now: NaiveDateTime,
    ) -> Result<()> {
        self.require_subject(subject)?;
        self.timers.set_question_count(subject, count);
        self.after_mutation(now);
        Ok(())
    }

    // ── Time log operations ──────────────────────────────────────────

    /// Manual session entry. Rejected before any mutation when the range
    /// is inverted or the subject is outside the profile.
    pub fn add_manual_log(
        &mut self,
        subject: Subject,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        question_count: u32,
        notes: Option<String>,
        now: NaiveDateTime,
    ) -> Result<TimeLog> {
        self.require_subject(subject)?;
        if end_time <= start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: start_time,
                end: end_time,
            }
            .into());
        }
        let mut log = TimeLog::manual(subject, start_time, end_time, question_count, now);
        log.notes = notes;
        self.bundle.time_logs.push(log.clone());
        self.after_mutation(now);
        Ok(log)
    }

    pub fn edit_log_end_time(
        &mut self,
        log_id: &str,
        end_time: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<()> {
        let log = self.find_log_mut(log_id)?;
        log.set_end_time(end_time)?;
        self.after_mutation(now);
        Ok(())
    }

    pub fn edit_log_question_count(
        &mut self,
        log_id: &str,
        question_count: u32,
        now: NaiveDateTime,
    ) -> Result<()> {
        self.find_log_mut(log_id)?.question_count = question_count;
        self.after_mutation(now);
        Ok(())
    }

    pub fn edit_log_notes(
        &mut self,
        log_id: &str,
        notes: Option<String>,
        now: NaiveDateTime,
    ) -> Result<()> {
        self.find_log_mut(log_id)?.notes = notes;
        self.after_mutation(now);
        Ok(())
    }

    pub fn delete_log(&mut self, log_id: &str, now: NaiveDateTime) -> Result<()> {
        let before = self.bundle.time_logs.len();
        self.bundle.time_logs.retain(|l| l.id != log_id);
        if self.bundle.time_logs.len() == before {
            return Err(not_found("time log", log_id));
        }
        self.after_mutation(now);
        Ok(())
    }

    pub fn time_logs(&self) -> &[TimeLog] {
        &self.bundle.time_logs
    }

    // ── Task operations ──────────────────────────────────────────────

    pub fn add_task(&mut self, task: Task, now: NaiveDateTime) -> Result<()> {
        self.require_subject(task.subject)?;
        self.bundle.tasks.push(task);
        self.after_mutation(now);
        Ok(())
    }

    /// Toggle completion; returns the new state.
    pub fn toggle_task(&mut self, task_id: &str, now: NaiveDateTime) -> Result<bool> {
        let task = self
            .bundle
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| not_found("task", task_id))?;
        task.completed = !task.completed;
        let completed = task.completed;
        self.after_mutation(now);
        Ok(completed)
    }

    /// Delete a task. Timers and logs holding its id keep their snapshot
    /// title; the reference is weak by design.
    pub fn delete_task(&mut self, task_id: &str, now: NaiveDateTime) -> Result<()> {
        let before = self.bundle.tasks.len();
        self.bundle.tasks.retain(|t| t.id != task_id);
        if self.bundle.tasks.len() == before {
            return Err(not_found("task", task_id));
        }
        self.after_mutation(now);
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.bundle.tasks
    }

    // ── Test results ─────────────────────────────────────────────────

    pub fn record_test(&mut self, mut result: TestResult, now: NaiveDateTime) {
        result.recompute();
        self.bundle.test_results.push(result);
        self.after_mutation(now);
    }

    /// Replace an existing result by id, re-deriving all computed fields.
    pub fn update_test(&mut self, mut result: TestResult, now: NaiveDateTime) -> Result<()> {
        let slot = self
            .bundle
            .test_results
            .iter_mut()
            .find(|t| t.id == result.id)
            .ok_or_else(|| not_found("test result", &result.id))?;
        result.recompute();
        *slot = result;
        self.after_mutation(now);
        Ok(())
    }

    pub fn delete_test(&mut self, test_id: &str, now: NaiveDateTime) -> Result<()> {
        let before = self.bundle.test_results.len();
        self.bundle.test_results.retain(|t| t.id != test_id);
        if self.bundle.test_results.len() == before {
            return Err(not_found("test result", test_id));
        }
        self.after_mutation(now);
        Ok(())
    }

    pub fn test_results(&self) -> &[TestResult] {
        &self.bundle.test_results
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn set_question_goal(&mut self, daily: u32, now: NaiveDateTime) {
        self.bundle.question_goal = QuestionGoal { daily };
        self.after_mutation(now);
    }

    /// Replace exam settings. A profile change re-derives the timer map,
    /// carrying subjects present in both sets, and snaps the viewed
    /// subject back to physics when it left the set.
    pub fn update_exam_settings(&mut self, settings: ExamSettings, now: NaiveDateTime) {
        self.timers.apply_profile(settings.exam_type);
        self.active_subject = self.timers.fallback_subject(self.active_subject);
        self.bundle.exam_settings = settings;
        self.after_mutation(now);
    }

    // ── Sync lifecycle ───────────────────────────────────────────────

    /// Sign in: one-shot migration when the remote row is empty, remote
    /// wins when it exists, local fallback when the download fails.
    pub fn sign_in(
        &mut self,
        user_id: &str,
        remote: Box<dyn RemoteStore>,
        now: NaiveDateTime,
    ) -> SignInOutcome {
        self.phase = SyncPhase::Migrating;
        self.snapshot_timers();

        let outcome =
            match reconciler::reconcile_sign_in(remote.as_ref(), user_id, &self.bundle, Utc::now())
            {
                Ok((bundle, outcome)) => {
                    if outcome == SignInOutcome::DownloadedRemote {
                        self.replace_bundle(bundle);
                    }
                    self.last_sync_at = Some(Utc::now());
                    outcome
                }
                Err(err) => {
                    log::warn!("sign-in download failed, using local state: {err}");
                    SignInOutcome::FallbackLocal
                }
            };

        self.remote = Some(remote);
        self.user_id = Some(user_id.to_string());
        self.phase = SyncPhase::Synced;
        self.schedule.arm(now);
        outcome
    }

    /// Sign out: cancel pending pushes so nothing stale lands after the
    /// user context changed, then fall back to local persistence.
    pub fn sign_out(&mut self, _now: NaiveDateTime) {
        self.schedule.clear();
        self.remote = None;
        self.user_id = None;
        self.phase = SyncPhase::Anonymous;
        self.last_sync_at = None;
        self.snapshot_timers();
        if let Err(err) = self.store.save_bundle(&self.bundle) {
            log::warn!("failed to persist state on sign-out: {err}");
        }
    }

    /// User-triggered immediate push, bypassing the debounce.
    pub fn sync_now(&mut self, now: NaiveDateTime) -> Result<(), SyncError> {
        if self.phase != SyncPhase::Synced {
            return Err(SyncError::NotSignedIn);
        }
        self.push(now)
    }

    /// Drive pending deadlines. Call on the UI tick; a failed push is
    /// logged and left for the next debounce/periodic cycle.
    pub fn poll_sync(&mut self, now: NaiveDateTime) {
        if self.phase != SyncPhase::Synced || !self.schedule.due(now) {
            return;
        }
        if let Err(err) = self.push(now) {
            log::warn!("scheduled push failed, will retry next cycle: {err}");
        }
    }

    fn push(&mut self, now: NaiveDateTime) -> Result<(), SyncError> {
        let user_id = self.user_id.clone().ok_or(SyncError::NotSignedIn)?;
        self.snapshot_timers();
        let record = RemoteRecord::from_bundle(&user_id, &self.bundle, Utc::now())?;
        let result = match &self.remote {
            Some(remote) => remote.upsert(&user_id, &record),
            None => Err(SyncError::NotSignedIn),
        };
        // Clear the debounce either way; a failure waits for the next
        // scheduled cycle rather than hot-looping.
        self.schedule.pushed(now);
        if result.is_ok() {
            self.last_sync_at = Some(Utc::now());
        }
        result
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn require_subject(&self, subject: Subject) -> Result<()> {
        if self.timers.timer(subject).is_none() {
            return Err(ValidationError::UnknownSubject(subject.to_string()).into());
        }
        Ok(())
    }

    fn find_log_mut(&mut self, log_id: &str) -> Result<&mut TimeLog> {
        let id = log_id.to_string();
        self.bundle
            .time_logs
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| not_found("time log", &id))
    }

    fn snapshot_timers(&mut self) {
        self.bundle.timer_states = self.timers.timers().clone();
    }

    fn replace_bundle(&mut self, bundle: StateBundle) {
        self.timers = TimerEngine::from_states(
            bundle.exam_settings.exam_type,
            bundle.timer_states.clone(),
        );
        self.active_subject = self.timers.fallback_subject(self.active_subject);
        self.bundle = bundle;
    }

    /// Runs after every mutation: re-derive today's aggregate, re-check
    /// the streak against it, then persist or schedule per phase.
    fn after_mutation(&mut self, now: NaiveDateTime) {
        let stats = self.today_stats(now);
        self.bundle.streak_data = evaluate_streak(
            &self.bundle.streak_data,
            stats.total_study_hours(),
            stats.total_questions,
            &self.bundle.exam_settings.streak_settings,
            now,
        );
        self.snapshot_timers();

        match self.phase {
            SyncPhase::Anonymous => {
                if let Err(err) = self.store.save_bundle(&self.bundle) {
                    log::warn!("local persistence failed: {err}");
                }
            }
            SyncPhase::Synced => self.schedule.note_mutation(now),
            SyncPhase::Migrating => {}
        }
    }
}

fn not_found(kind: &str, id: &str) -> CoreError {
    ValidationError::NotFound {
        kind: kind.to_string(),
        id: id.to_string(),
    }
    .into()
}
