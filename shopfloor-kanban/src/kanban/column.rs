//! GetColumn command

use super::jobs_to_json;
use crate::columns::KanbanColumn;
use crate::context::KanbanContext;
use crate::db;
use crate::error::{KanbanError, Result};
use crate::operation::{operation, Execute};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Jobs shown in one kanban column.
///
/// Working columns are ordered by priority, highest first. The archived
/// column is ordered newest first and capped at the configured page size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetColumn {
    pub column: KanbanColumn,
}

operation!(
    GetColumn,
    verb = "get",
    noun = "column",
    mutates = false,
    description = "List the jobs in a kanban column"
);

impl GetColumn {
    /// List the jobs shown in `column`
    pub fn new(column: KanbanColumn) -> Self {
        Self { column }
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for GetColumn {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let statuses = self.column.statuses();
        let jobs = ctx.db().read(|conn| match self.column {
            KanbanColumn::Archived => {
                db::newest_jobs_in_statuses(conn, statuses, ctx.config().archived_page_size)
            }
            _ => db::jobs_in_statuses(conn, statuses),
        })?;
        debug!(column = %self.column, count = jobs.len(), "loaded column");

        Ok(serde_json::json!({
            "column": self.column,
            "title": self.column.title(),
            "count": jobs.len(),
            "jobs": jobs_to_json(&jobs)?,
        }))
    }
}
