//! Operation traits shared by every command
//!
//! A command is a struct whose fields are its parameters. [`Operation`] gives
//! it a canonical name; [`Execute`] runs it against a context.

use crate::types::LogEntry;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Metadata every command carries
pub trait Operation: Serialize + Send + Sync {
    /// Action word, e.g. "reorder"
    fn verb(&self) -> &'static str;

    /// Target word, e.g. "job"
    fn noun(&self) -> &'static str;

    /// One-line description
    fn description(&self) -> &'static str;

    /// Whether the command changes the board and must be audited
    fn mutates(&self) -> bool;

    /// Canonical op string (e.g. "reorder job")
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Run a command against a context
#[async_trait]
pub trait Execute<C, E>: Operation
where
    C: Send + Sync,
{
    async fn execute(&self, ctx: &C) -> std::result::Result<Value, E>;
}

/// Implement [`Operation`] for a command struct
macro_rules! operation {
    (
        $ty:ty,
        verb = $verb:literal,
        noun = $noun:literal,
        mutates = $mutates:literal,
        description = $description:literal $(,)?
    ) => {
        impl $crate::operation::Operation for $ty {
            fn verb(&self) -> &'static str {
                $verb
            }

            fn noun(&self) -> &'static str {
                $noun
            }

            fn description(&self) -> &'static str {
                $description
            }

            fn mutates(&self) -> bool {
                $mutates
            }
        }
    };
}

pub(crate) use operation;

/// Result of executing an operation
///
/// Distinguishes between:
/// - Logged: operations that changed the board and are audited
/// - Unlogged: read-only operations
/// - Failed: errors (logged when the operation would have mutated)
pub enum ExecutionResult<T, E> {
    /// Operation succeeded and should be logged
    Logged { value: T, log_entry: LogEntry },
    /// Operation succeeded but no logging needed (read-only)
    Unlogged { value: T },
    /// Operation failed
    Failed {
        error: E,
        log_entry: Option<LogEntry>,
    },
}

impl<T, E> ExecutionResult<T, E> {
    /// Extract the result (Ok or Err)
    pub fn into_result(self) -> std::result::Result<T, E> {
        match self {
            Self::Logged { value, .. } | Self::Unlogged { value } => Ok(value),
            Self::Failed { error, .. } => Err(error),
        }
    }

    /// Get the value and log entry separately
    pub fn split(self) -> (std::result::Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, log_entry } => (Err(error), log_entry),
        }
    }

    /// Check if this should be logged
    pub fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Logged { .. }
                | Self::Failed {
                    log_entry: Some(_),
                    ..
                }
        )
    }
}
