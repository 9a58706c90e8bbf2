//! SQLite-backed local key-value store.
//!
//! Each piece of app state lives under its own key as a JSON document.
//! Loading is defensive: a malformed document for one key logs a warning
//! and falls back to that key's default without aborting the rest of the
//! load. Legacy time-log records are upgraded during deserialization (see
//! [`crate::model::TimeLog`]).

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::bundle::StateBundle;
use crate::error::{Result, StorageError};

use super::data_dir;

/// Local kv keys, one per state bundle field.
pub mod keys {
    pub const TASKS: &str = "tasks";
    pub const TIME_LOGS: &str = "time-logs";
    pub const QUESTION_GOAL: &str = "question-goal";
    pub const EXAM_SETTINGS: &str = "exam-settings";
    pub const STREAK_DATA: &str = "streak-data";
    pub const TIMER_STATES: &str = "timer-states";
    pub const TEST_RESULTS: &str = "test-results";
}

pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    /// Open the store at `<data_dir>/studytrack.db`, creating the schema
    /// if needed.
    pub fn open() -> Result<Self> {
        let path = data_dir().map_err(crate::error::CoreError::Io)?.join("studytrack.db");
        let conn = Connection::open(&path).map_err(|source| StorageError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(StorageError::from)?;
        Ok(())
    }

    /// Get a raw value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a raw value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Load one typed key, degrading to the default on a missing or
    /// malformed document.
    pub fn load_key<T>(&self, key: &str) -> Result<T, StorageError>
    where
        T: DeserializeOwned + Default,
    {
        match self.kv_get(key)? {
            None => Ok(T::default()),
            Some(json) => match serde_json::from_str(&json) {
                Ok(value) => Ok(value),
                Err(err) => {
                    log::warn!("discarding malformed '{key}' state: {err}");
                    Ok(T::default())
                }
            },
        }
    }

    /// Save one typed key.
    pub fn save_key<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        self.kv_set(key, &json)
    }

    /// Load the full state bundle, key by key, defaults for whatever is
    /// missing or unreadable.
    pub fn load_bundle(&self) -> Result<StateBundle, StorageError> {
        Ok(StateBundle {
            tasks: self.load_key(keys::TASKS)?,
            time_logs: self.load_key(keys::TIME_LOGS)?,
            question_goal: self.load_key(keys::QUESTION_GOAL)?,
            exam_settings: self.load_key(keys::EXAM_SETTINGS)?,
            streak_data: self.load_key(keys::STREAK_DATA)?,
            timer_states: self.load_key(keys::TIMER_STATES)?,
            test_results: self.load_key(keys::TEST_RESULTS)?,
        })
    }

    /// Persist the full state bundle across its keys.
    pub fn save_bundle(&self, bundle: &StateBundle) -> Result<(), StorageError> {
        self.save_key(keys::TASKS, &bundle.tasks)?;
        self.save_key(keys::TIME_LOGS, &bundle.time_logs)?;
        self.save_key(keys::QUESTION_GOAL, &bundle.question_goal)?;
        self.save_key(keys::EXAM_SETTINGS, &bundle.exam_settings)?;
        self.save_key(keys::STREAK_DATA, &bundle.streak_data)?;
        self.save_key(keys::TIMER_STATES, &bundle.timer_states)?;
        self.save_key(keys::TEST_RESULTS, &bundle.test_results)?;
        Ok(())
    }
}
