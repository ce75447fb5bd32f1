//! GetJob command

use super::job_to_json;
use crate::context::KanbanContext;
use crate::db;
use crate::error::{KanbanError, Result};
use crate::operation::{operation, Execute};
use crate::types::JobId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Get a job by ID
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetJob {
    /// The job ID to retrieve
    pub id: JobId,
}

operation!(
    GetJob,
    verb = "get",
    noun = "job",
    mutates = false,
    description = "Retrieve a job by ID"
);

impl GetJob {
    /// Fetch the job with this id
    pub fn new(id: impl Into<JobId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for GetJob {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let job = ctx.db().read(|conn| db::require_job(conn, &self.id))?;
        job_to_json(&job)
    }
}
