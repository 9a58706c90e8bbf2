//! Core error types for studytrack-core.
//!
//! Every failure in the core is recoverable: storage and sync errors
//! degrade to local/default state at the call site, validation errors
//! reject a mutation before any state changes.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studytrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Local storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Remote sync errors
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Local storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the local store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    ConfigLoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    ConfigSaveFailed { path: PathBuf, message: String },

    /// The store is locked by another process
    #[error("Store is locked")]
    Locked,
}

/// Remote sync errors.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Remote endpoint rejected or failed the request
    #[error("Remote error: {0}")]
    Remote(String),

    /// Network-level failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Payload could not be encoded/decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Sync was requested without a signed-in identity
    #[error("Not signed in")]
    NotSignedIn,

    /// Remote endpoint is not configured
    #[error("Remote endpoint not configured")]
    NotConfigured,
}

/// Validation errors for user-entered data.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end ({end}) must be after start ({start})")]
    InvalidTimeRange {
        start: chrono::NaiveDateTime,
        end: chrono::NaiveDateTime,
    },

    /// Subject not part of the active exam profile
    #[error("Subject '{0}' is not in the active exam profile")]
    UnknownSubject(String),

    /// Timer transition not legal from the current state
    #[error("Timer for '{subject}' is {state}")]
    IllegalTimerTransition { subject: String, state: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Referenced entity does not exist
    #[error("No {kind} with id '{id}'")]
    NotFound { kind: String, id: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(e.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
