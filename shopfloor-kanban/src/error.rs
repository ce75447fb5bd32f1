//! Error types for the job board engine

use std::path::PathBuf;
use thiserror::Error;

/// Result type for job board operations
pub type Result<T> = std::result::Result<T, KanbanError>;

/// Errors that can occur in job board operations
#[derive(Debug, Error)]
pub enum KanbanError {
    /// Board not initialized at the given path
    #[error("board not initialized at {path}")]
    NotInitialized { path: PathBuf },

    /// Board already exists
    #[error("board already exists at {path}")]
    AlreadyExists { path: PathBuf },

    /// Job not found (the moved job or one of its neighbours)
    #[error("job not found: {id}")]
    JobNotFound { id: String },

    /// Kanban column not found
    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    /// Unknown job status
    #[error("unknown job status: {value}")]
    UnknownStatus { value: String },

    /// Missing required field
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// A status column is in a state the ordering engine cannot resolve
    #[error("invalid state in column '{status}': {message}")]
    InvalidState { status: String, message: String },

    /// Configuration could not be loaded or failed validation
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Another writer holds the database lock
    #[error("store busy - another operation in progress")]
    StoreBusy,

    /// SQLite error
    #[error("database error: {0}")]
    Database(#[source] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KanbanError {
    /// Create a job not found error
    pub fn job_not_found(id: impl ToString) -> Self {
        Self::JobNotFound { id: id.to_string() }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid state error for a status column
    pub fn invalid_state(status: impl ToString, message: impl Into<String>) -> Self {
        Self::InvalidState {
            status: status.to_string(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreBusy)
    }

    /// Check if this error means a job (or neighbour) does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::JobNotFound { .. } | Self::ColumnNotFound { .. })
    }
}

impl From<rusqlite::Error> for KanbanError {
    fn from(error: rusqlite::Error) -> Self {
        match error.sqlite_error_code() {
            Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked) => {
                Self::StoreBusy
            }
            _ => Self::Database(error),
        }
    }
}

impl From<figment::Error> for KanbanError {
    fn from(error: figment::Error) -> Self {
        Self::config(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KanbanError::JobNotFound {
            id: "abc123".into(),
        };
        assert_eq!(err.to_string(), "job not found: abc123");
    }

    #[test]
    fn test_invalid_state_display() {
        let err = KanbanError::invalid_state("quoting", "duplicate priority 1000");
        assert_eq!(
            err.to_string(),
            "invalid state in column 'quoting': duplicate priority 1000"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(KanbanError::StoreBusy.is_retryable());
        assert!(!KanbanError::job_not_found("x").is_retryable());
    }

    #[test]
    fn test_busy_sqlite_error_maps_to_store_busy() {
        let busy = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        assert!(matches!(KanbanError::from(busy), KanbanError::StoreBusy));

        let other = rusqlite::Error::QueryReturnedNoRows;
        assert!(matches!(
            KanbanError::from(other),
            KanbanError::Database(_)
        ));
    }

    #[test]
    fn test_database_error_keeps_source() {
        use std::error::Error as _;

        let err = KanbanError::from(rusqlite::Error::QueryReturnedNoRows);
        let source = err.source().expect("database error has a source");
        assert_eq!(
            source.to_string(),
            rusqlite::Error::QueryReturnedNoRows.to_string()
        );
    }

    #[test]
    fn test_not_found_classification() {
        assert!(KanbanError::job_not_found("j1").is_not_found());
        assert!(!KanbanError::StoreBusy.is_not_found());
    }
}
