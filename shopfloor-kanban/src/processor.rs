//! Operation processor: runs commands and writes the audit log

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::operation::{Execute, ExecutionResult};
use crate::types::{JobId, LogEntry};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

/// Executes commands against a board and records mutating ones in the
/// global activity log and in the affected job's log
#[derive(Debug, Clone, Default)]
pub struct KanbanOperationProcessor {
    actor: Option<String>,
}

impl KanbanOperationProcessor {
    /// Create a processor with no actor
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor that stamps every log entry with `actor`
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }

    /// The actor recorded in log entries
    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    /// Execute `op`, log it if it mutates the board, and return its value
    pub async fn process<O>(&self, op: &O, ctx: &KanbanContext) -> Result<Value>
    where
        O: Execute<KanbanContext, KanbanError>,
    {
        let op_string = op.op_string();
        let input = serde_json::to_value(op)?;
        let start = Instant::now();
        let result = op.execute(ctx).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let execution = match result {
            Ok(value) if op.mutates() => ExecutionResult::Logged {
                log_entry: LogEntry::success(&op_string, input, value.clone(), duration_ms),
                value,
            },
            Ok(value) => ExecutionResult::Unlogged { value },
            Err(error) => {
                warn!(op = %op_string, %error, "operation failed");
                let log_entry = op
                    .mutates()
                    .then(|| LogEntry::failure(&op_string, input, &error.to_string(), duration_ms));
                ExecutionResult::Failed { error, log_entry }
            }
        };

        let (result, log_entry) = execution.split();
        if let Some(entry) = log_entry {
            let entry = match &self.actor {
                Some(actor) => entry.with_actor(actor),
                None => entry,
            };
            self.write_log(ctx, &entry).await;
        }

        debug!(op = %op_string, duration_ms, ok = result.is_ok(), "processed operation");
        result
    }

    /// Write `entry` to the activity and job logs.
    ///
    /// The operation has already committed by now, so a log that cannot be
    /// written is reported and the operation's result still stands.
    async fn write_log(&self, ctx: &KanbanContext, entry: &LogEntry) {
        if let Err(error) = ctx.append_activity(entry).await {
            warn!(op = %entry.op, %error, "failed to write activity log");
        }
        if let Some(id) = entry.job_id() {
            let id = JobId::from_string(id);
            if let Err(error) = ctx.append_job_log(&id, entry).await {
                warn!(op = %entry.op, job = %id, %error, "failed to write job log");
            }
        }
    }
}
