//! Core error types for pillbox-core.
//!
//! Storage failures are caught at the store boundary and only surface here
//! through the `try_*` adapter calls, where the controller turns them into a
//! user-visible message. Nothing in this hierarchy is meant to be fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pillbox-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Reading or decoding the medication slot failed
    #[error("Failed to read '{slot}' from storage: {message}")]
    StorageRead { slot: String, message: String },

    /// Encoding or writing the medication slot failed
    #[error("Failed to write '{slot}' to storage: {message}")]
    StorageWrite { slot: String, message: String },

    /// No medication with the given id
    #[error("Medication not found: {id}")]
    NotFound { id: u64 },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be prepared
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors, raised before anything reaches the repository.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty after trimming
    #[error("'{field}' must not be empty")]
    EmptyField { field: &'static str },

    /// A schedule entry is not a 24-hour HH:MM time
    #[error("Invalid time '{value}': expected HH:MM (24-hour)")]
    InvalidTime { value: String },

    /// Frequency label is not one of the known options
    #[error("Unknown frequency '{0}'")]
    UnknownFrequency(String),

    /// A take timestamp lies in the future
    #[error("lastTaken ({0}) is after the current time")]
    TakenInFuture(chrono::DateTime<chrono::Utc>),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseBusy
                    || err.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
