//! DeleteJob command

use crate::context::KanbanContext;
use crate::db;
use crate::error::{KanbanError, Result};
use crate::operation::{operation, Execute};
use crate::types::JobId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Delete a job. Its priority slot is freed; the column is not renumbered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteJob {
    /// The job ID to delete
    pub id: JobId,
}

operation!(
    DeleteJob,
    verb = "delete",
    noun = "job",
    mutates = true,
    description = "Delete a job"
);

impl DeleteJob {
    /// Delete the job with this id
    pub fn new(id: impl Into<JobId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for DeleteJob {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let deleted = ctx.db().write(|tx| db::delete_job(tx, &self.id))?;
        if !deleted {
            return Err(KanbanError::job_not_found(&self.id));
        }

        info!(id = %self.id, "deleted job");
        Ok(serde_json::json!({
            "deleted": true,
            "id": self.id,
        }))
    }
}
