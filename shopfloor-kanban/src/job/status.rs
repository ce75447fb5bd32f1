//! ChangeJobStatus command

use super::job_to_json;
use crate::context::KanbanContext;
use crate::db;
use crate::error::{KanbanError, Result};
use crate::operation::{operation, Execute};
use crate::ordering::MoveRequest;
use crate::types::{JobId, JobStatus};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Change a job's status, placing it at the top of the new status column.
///
/// Setting the status a job already has leaves it where it is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeJobStatus {
    /// The job to update
    pub id: JobId,
    /// The new status
    pub status: JobStatus,
}

operation!(
    ChangeJobStatus,
    verb = "status",
    noun = "job",
    mutates = true,
    description = "Change a job's status"
);

impl ChangeJobStatus {
    /// Move a job into `status`
    pub fn new(id: impl Into<JobId>, status: JobStatus) -> Self {
        Self {
            id: id.into(),
            status,
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ChangeJobStatus {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let service = ctx.reorder_service();
        let request = MoveRequest {
            status: Some(self.status),
            ..MoveRequest::default()
        };

        let (job, previous) = ctx.db().write(|tx| {
            let current = db::require_job(tx, &self.id)?;
            if current.status == self.status {
                return Ok((current, None));
            }
            let outcome = service.move_job(tx, &self.id, &request)?;
            Ok((outcome.job, Some(outcome.previous_status)))
        })?;

        if let Some(previous) = previous {
            info!(id = %self.id, from = %previous, to = %job.status, "changed job status");
        }

        let mut value = job_to_json(&job)?;
        if let Value::Object(map) = &mut value {
            map.insert(
                "previous_status".into(),
                serde_json::to_value(previous.unwrap_or(job.status))?,
            );
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KanbanConfig;
    use crate::job::AddJob;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, KanbanContext) {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::init_with_config(temp.path().join(".shopfloor"), KanbanConfig::default())
            .await
            .unwrap();
        (temp, ctx)
    }

    #[tokio::test]
    async fn test_change_status_goes_to_top_of_new_column() {
        let (_temp, ctx) = setup().await;
        AddJob::new("Running")
            .with_status(JobStatus::InProgress)
            .execute(&ctx)
            .await
            .unwrap();
        let quote = AddJob::new("Quote").execute(&ctx).await.unwrap();
        let id = quote["id"].as_str().unwrap();

        let result = ChangeJobStatus::new(id, JobStatus::InProgress)
            .execute(&ctx)
            .await
            .unwrap();

        assert_eq!(result["status"], "in_progress");
        assert_eq!(result["previous_status"], "quoting");
        assert_eq!(result["priority"], 2000);
    }

    #[tokio::test]
    async fn test_same_status_is_a_no_op() {
        let (_temp, ctx) = setup().await;
        let first = AddJob::new("First").execute(&ctx).await.unwrap();
        AddJob::new("Second").execute(&ctx).await.unwrap();
        let id = first["id"].as_str().unwrap();

        let result = ChangeJobStatus::new(id, JobStatus::Quoting)
            .execute(&ctx)
            .await
            .unwrap();

        assert_eq!(result["priority"], 1000);
        assert_eq!(result["previous_status"], "quoting");
    }

    #[tokio::test]
    async fn test_change_status_of_missing_job() {
        let (_temp, ctx) = setup().await;
        let result = ChangeJobStatus::new("ghost", JobStatus::OnHold)
            .execute(&ctx)
            .await;
        assert!(matches!(result, Err(KanbanError::JobNotFound { .. })));
    }
}
