//! CheckColumn command

use crate::context::KanbanContext;
use crate::db;
use crate::error::{KanbanError, Result};
use crate::operation::{operation, Execute};
use crate::types::JobStatus;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

/// Report priorities shared by more than one job in a status.
///
/// A healthy column has none; a rebalance repairs any that are found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckColumn {
    pub status: JobStatus,
}

operation!(
    CheckColumn,
    verb = "check",
    noun = "column",
    mutates = false,
    description = "Report duplicate priorities in a status column"
);

impl CheckColumn {
    /// Check the `status` column for duplicate priorities
    pub fn new(status: JobStatus) -> Self {
        Self { status }
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for CheckColumn {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let duplicates = ctx
            .db()
            .read(|conn| db::duplicate_priorities(conn, self.status))?;

        if !duplicates.is_empty() {
            warn!(status = %self.status, count = duplicates.len(), "duplicate priorities in column");
        }

        let report: Vec<Value> = duplicates
            .iter()
            .map(|(priority, ids)| json!({ "priority": priority, "jobs": ids }))
            .collect();

        Ok(json!({
            "status": self.status,
            "ok": report.is_empty(),
            "duplicates": report,
        }))
    }
}
