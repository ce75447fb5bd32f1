//! ListActiveJobs command

use super::jobs_to_json;
use crate::columns::KanbanColumn;
use crate::context::KanbanContext;
use crate::db;
use crate::error::{KanbanError, Result};
use crate::operation::{operation, Execute};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every job outside the archived column, in board order: column by column,
/// highest priority first within each
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListActiveJobs {}

operation!(
    ListActiveJobs,
    verb = "list",
    noun = "active",
    mutates = false,
    description = "List every job that is not archived"
);

impl ListActiveJobs {
    /// List every job outside the archived column
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ListActiveJobs {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let jobs = ctx.db().read(|conn| {
            let mut jobs = Vec::new();
            for column in KanbanColumn::ALL {
                if column == KanbanColumn::Archived {
                    continue;
                }
                jobs.extend(db::jobs_in_statuses(conn, column.statuses())?);
            }
            Ok(jobs)
        })?;

        Ok(serde_json::json!({
            "count": jobs.len(),
            "jobs": jobs_to_json(&jobs)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KanbanConfig;
    use crate::job::AddJob;
    use crate::types::JobStatus;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_active_jobs_exclude_archived() {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::init_with_config(temp.path().join(".shopfloor"), KanbanConfig::default())
            .await
            .unwrap();

        for (name, status) in [
            ("Finished", JobStatus::Completed),
            ("Old", JobStatus::Archived),
            ("Running", JobStatus::InProgress),
            ("Quote", JobStatus::Quoting),
        ] {
            AddJob::new(name)
                .with_status(status)
                .execute(&ctx)
                .await
                .unwrap();
        }

        let result = ListActiveJobs::new().execute(&ctx).await.unwrap();
        let names: Vec<_> = result["jobs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|j| j["name"].as_str().unwrap())
            .collect();

        assert_eq!(result["count"], 3);
        assert_eq!(names, vec!["Quote", "Running", "Finished"]);
    }
}
