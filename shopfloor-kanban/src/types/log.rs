//! Log entry types for activity tracking

use super::ids::LogEntryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A log entry recording an operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique ID for this log entry
    pub id: LogEntryId,

    /// When the operation occurred
    pub timestamp: DateTime<Utc>,

    /// Canonical op string (e.g., "reorder job")
    pub op: String,

    /// The normalized input parameters
    pub input: Value,

    /// The result (or error)
    pub output: Value,

    /// Who performed the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// How long the operation took
    pub duration_ms: u64,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(
        op: impl Into<String>,
        input: Value,
        output: Value,
        actor: Option<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: LogEntryId::new(),
            timestamp: Utc::now(),
            op: op.into(),
            input,
            output,
            actor,
            duration_ms,
        }
    }

    /// Create a log entry for a successful operation
    pub fn success(op: impl Into<String>, input: Value, output: Value, duration_ms: u64) -> Self {
        Self::new(op, input, output, None, duration_ms)
    }

    /// Create a log entry for a failed operation
    pub fn failure(op: impl Into<String>, input: Value, error: &str, duration_ms: u64) -> Self {
        Self::new(
            op,
            input,
            serde_json::json!({ "error": error }),
            None,
            duration_ms,
        )
    }

    /// Set the actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// The job this entry concerns, taken from the input `id` or else the output `id`
    pub fn job_id(&self) -> Option<&str> {
        self.input
            .get("id")
            .and_then(|v| v.as_str())
            .or_else(|| self.output.get("id").and_then(|v| v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entry_creation() {
        let entry = LogEntry::success(
            "add job",
            serde_json::json!({"name": "Test"}),
            serde_json::json!({"id": "abc123"}),
            50,
        );

        assert_eq!(entry.op, "add job");
        assert_eq!(entry.duration_ms, 50);
        assert!(entry.actor.is_none());
        assert_eq!(entry.job_id(), Some("abc123"));
    }

    #[test]
    fn test_log_entry_with_actor() {
        let entry = LogEntry::success("reorder job", Value::Null, Value::Null, 10)
            .with_actor("workshop[session123]");

        assert_eq!(entry.actor, Some("workshop[session123]".into()));
    }

    #[test]
    fn test_failure_entry_prefers_input_id() {
        let entry = LogEntry::failure(
            "reorder job",
            serde_json::json!({"id": "job-1"}),
            "job not found: job-1",
            3,
        );

        assert_eq!(entry.job_id(), Some("job-1"));
        assert_eq!(entry.output["error"], "job not found: job-1");
    }
}
