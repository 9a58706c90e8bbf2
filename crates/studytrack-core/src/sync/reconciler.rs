//! Sign-in reconciliation and push scheduling.
//!
//! Sign-in follows a one-shot rule: an empty remote row means the local
//! bundle migrates up wholesale; an existing row means remote wins and
//! replaces local in-memory state. No field-level merging -- the backend
//! serializes writes per user key, so last write wins.
//!
//! While synced, pushes are driven by two explicit deadlines the
//! controller polls: a short debounce that resets (never stacks) on each
//! mutation, and an independent periodic interval. Both deadlines are
//! plain fields, cleared on sign-out so no stale closure can push an
//! outdated bundle after the user context changed.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Serialize;

use crate::bundle::StateBundle;
use crate::error::SyncError;

use super::remote::{RemoteRecord, RemoteStore};

/// Debounce window collapsing rapid successive edits into one write.
pub const DEBOUNCE: Duration = Duration::seconds(2);
/// Cadence of the unconditional background push.
pub const PERIODIC: Duration = Duration::minutes(5);

/// Session phase with respect to the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    /// No identity; every mutation persists to the local store only.
    Anonymous,
    /// Sign-in reconciliation in flight.
    Migrating,
    /// Remote is authoritative; mutations schedule pushes.
    Synced,
}

/// How a sign-in was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInOutcome {
    /// Remote row was empty; local state became the initial record.
    MigratedLocal,
    /// Remote row existed; it replaced local in-memory state.
    DownloadedRemote,
    /// Download failed; local state stays authoritative this session.
    FallbackLocal,
}

/// Resolve sign-in against the remote store.
pub fn reconcile_sign_in(
    remote: &dyn RemoteStore,
    user_id: &str,
    local: &StateBundle,
    now: DateTime<Utc>,
) -> Result<(StateBundle, SignInOutcome), SyncError> {
    match remote.fetch(user_id)? {
        Some(record) => Ok((record.into_bundle(), SignInOutcome::DownloadedRemote)),
        None => {
            if !local.is_empty() {
                let record = RemoteRecord::from_bundle(user_id, local, now)?;
                remote.upsert(user_id, &record)?;
            }
            Ok((local.clone(), SignInOutcome::MigratedLocal))
        }
    }
}

/// Pending push deadlines.
#[derive(Debug, Clone, Default)]
pub struct SyncSchedule {
    debounce_at: Option<NaiveDateTime>,
    periodic_at: Option<NaiveDateTime>,
}

impl SyncSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the periodic push; called once when entering `Synced`.
    pub fn arm(&mut self, now: NaiveDateTime) {
        self.periodic_at = Some(now + PERIODIC);
    }

    /// A mutation happened: reset the debounce deadline. Resetting, not
    /// stacking -- a burst of edits lands as one write.
    pub fn note_mutation(&mut self, now: NaiveDateTime) {
        self.debounce_at = Some(now + DEBOUNCE);
        if self.periodic_at.is_none() {
            self.periodic_at = Some(now + PERIODIC);
        }
    }

    /// Whether a push is due at `now`.
    pub fn due(&self, now: NaiveDateTime) -> bool {
        self.debounce_at.is_some_and(|t| now >= t) || self.periodic_at.is_some_and(|t| now >= t)
    }

    /// A push completed (or was forced): clear the debounce, restart the
    /// periodic interval.
    pub fn pushed(&mut self, now: NaiveDateTime) {
        self.debounce_at = None;
        self.periodic_at = Some(now + PERIODIC);
    }

    /// Cancel everything (sign-out / teardown).
    pub fn clear(&mut self) {
        self.debounce_at = None;
        self.periodic_at = None;
    }

    pub fn is_idle(&self) -> bool {
        self.debounce_at.is_none() && self.periodic_at.is_none()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// In-memory remote for controller tests.
    #[derive(Default)]
    pub struct FakeRemote {
        pub rows: Mutex<HashMap<String, RemoteRecord>>,
        pub fail_fetch: Mutex<bool>,
        pub fail_upsert: Mutex<bool>,
        pub upsert_count: Mutex<usize>,
    }

    impl FakeRemote {
        pub fn with_record(user_id: &str, record: RemoteRecord) -> Self {
            let fake = Self::default();
            fake.rows.lock().unwrap().insert(user_id.to_string(), record);
            fake
        }

        pub fn upserts(&self) -> usize {
            *self.upsert_count.lock().unwrap()
        }
    }

    impl RemoteStore for FakeRemote {
        fn fetch(&self, user_id: &str) -> Result<Option<RemoteRecord>, SyncError> {
            if *self.fail_fetch.lock().unwrap() {
                return Err(SyncError::Remote("fetch down".into()));
            }
            Ok(self.rows.lock().unwrap().get(user_id).cloned())
        }

        fn upsert(&self, user_id: &str, record: &RemoteRecord) -> Result<(), SyncError> {
            if *self.fail_upsert.lock().unwrap() {
                return Err(SyncError::Remote("upsert down".into()));
            }
            *self.upsert_count.lock().unwrap() += 1;
            self.rows
                .lock()
                .unwrap()
                .insert(user_id.to_string(), record.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeRemote;
    use super::*;
    use crate::model::{Subject, Task};
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn local_bundle() -> StateBundle {
        let mut bundle = StateBundle::default();
        bundle
            .tasks
            .push(Task::new("Electrostatics PYQs", Subject::Physics, at(10, 0, 0)));
        bundle
    }

    #[test]
    fn empty_remote_migrates_local_up() {
        let remote = FakeRemote::default();
        let local = local_bundle();
        let (bundle, outcome) =
            reconcile_sign_in(&remote, "user-1", &local, Utc::now()).unwrap();
        assert_eq!(outcome, SignInOutcome::MigratedLocal);
        assert_eq!(bundle.tasks.len(), 1);
        assert_eq!(remote.upserts(), 1);

        let uploaded = remote.rows.lock().unwrap()["user-1"].clone().into_bundle();
        assert_eq!(uploaded.tasks[0].title, "Electrostatics PYQs");
    }

    #[test]
    fn empty_local_and_remote_skips_migration_write() {
        let remote = FakeRemote::default();
        let (_, outcome) =
            reconcile_sign_in(&remote, "user-1", &StateBundle::default(), Utc::now()).unwrap();
        assert_eq!(outcome, SignInOutcome::MigratedLocal);
        assert_eq!(remote.upserts(), 0);
    }

    #[test]
    fn existing_remote_wins_over_local() {
        let mut remote_bundle = StateBundle::default();
        remote_bundle.question_goal.daily = 150;
        let record =
            RemoteRecord::from_bundle("user-1", &remote_bundle, Utc::now()).unwrap();
        let remote = FakeRemote::with_record("user-1", record);

        let local = local_bundle();
        let (bundle, outcome) =
            reconcile_sign_in(&remote, "user-1", &local, Utc::now()).unwrap();
        assert_eq!(outcome, SignInOutcome::DownloadedRemote);
        assert_eq!(bundle.question_goal.daily, 150);
        // Local-only task was discarded, not merged.
        assert!(bundle.tasks.is_empty());
        assert_eq!(remote.upserts(), 0);
    }

    #[test]
    fn fetch_failure_propagates() {
        let remote = FakeRemote::default();
        *remote.fail_fetch.lock().unwrap() = true;
        let err = reconcile_sign_in(&remote, "user-1", &local_bundle(), Utc::now());
        assert!(err.is_err());
    }

    #[test]
    fn debounce_resets_instead_of_stacking() {
        let mut schedule = SyncSchedule::new();
        schedule.note_mutation(at(10, 0, 0));
        assert!(!schedule.due(at(10, 0, 1)));
        assert!(schedule.due(at(10, 0, 2)));

        // A second edit inside the window pushes the deadline out.
        schedule.note_mutation(at(10, 0, 1));
        assert!(!schedule.due(at(10, 0, 2)));
        assert!(schedule.due(at(10, 0, 3)));
    }

    #[test]
    fn periodic_fires_without_mutations() {
        let mut schedule = SyncSchedule::new();
        schedule.arm(at(10, 0, 0));
        assert!(!schedule.due(at(10, 4, 59)));
        assert!(schedule.due(at(10, 5, 0)));

        schedule.pushed(at(10, 5, 0));
        assert!(!schedule.due(at(10, 5, 1)));
        assert!(schedule.due(at(10, 10, 0)));
    }

    #[test]
    fn clear_cancels_pending_deadlines() {
        let mut schedule = SyncSchedule::new();
        schedule.note_mutation(at(10, 0, 0));
        schedule.clear();
        assert!(schedule.is_idle());
        assert!(!schedule.due(at(11, 0, 0)));
    }
}
