//! ReorderJob command

use super::job_to_json;
use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::operation::{operation, Execute};
use crate::ordering::MoveRequest;
use crate::types::{JobId, JobStatus};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Move a job between two neighbours, optionally into another status.
///
/// `before` and `after` are named in priority order: the job ends up with a
/// priority greater than `before` and less than `after`. Columns are shown
/// highest priority first, so `after` is the card displayed directly above
/// the moved job and `before` the card directly below it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderJob {
    /// The job to move
    pub id: JobId,
    /// Neighbour that ends up below the job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<JobId>,
    /// Neighbour that ends up above the job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<JobId>,
    /// New status, if the job changes column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
}

operation!(
    ReorderJob,
    verb = "reorder",
    noun = "job",
    mutates = true,
    description = "Move a job between two neighbours, optionally changing its status"
);

impl ReorderJob {
    /// Move a job to the top of its current column
    pub fn new(id: impl Into<JobId>) -> Self {
        Self {
            id: id.into(),
            before: None,
            after: None,
            status: None,
        }
    }

    /// Place the job above `before`
    pub fn with_before(mut self, before: impl Into<JobId>) -> Self {
        self.before = Some(before.into());
        self
    }

    /// Place the job below `after`
    pub fn with_after(mut self, after: impl Into<JobId>) -> Self {
        self.after = Some(after.into());
        self
    }

    /// Move the job into `status`
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ReorderJob {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let service = ctx.reorder_service();
        let request = MoveRequest {
            before: self.before.as_ref(),
            after: self.after.as_ref(),
            status: self.status,
        };
        let outcome = ctx
            .db()
            .write(|tx| service.move_job(tx, &self.id, &request))?;

        info!(
            id = %self.id,
            status = %outcome.job.status,
            priority = outcome.job.priority,
            rebalanced = outcome.rebalanced.is_some(),
            "reordered job"
        );

        let mut value = job_to_json(&outcome.job)?;
        if let Value::Object(map) = &mut value {
            map.insert(
                "previous_status".into(),
                serde_json::to_value(outcome.previous_status)?,
            );
            map.insert("previous_priority".into(), outcome.previous_priority.into());
            map.insert(
                "rebalanced".into(),
                outcome.rebalanced.as_ref().map_or(0, |m| m.len()).into(),
            );
        }
        Ok(value)
    }
}
