//! RebalanceColumn command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::operation::{operation, Execute};
use crate::ordering::rebalance_column;
use crate::types::JobStatus;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Renumber a status column to evenly spaced priorities, keeping its order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceColumn {
    pub status: JobStatus,
}

operation!(
    RebalanceColumn,
    verb = "rebalance",
    noun = "column",
    mutates = true,
    description = "Renumber the priorities of a status column"
);

impl RebalanceColumn {
    /// Rebalance the `status` column
    pub fn new(status: JobStatus) -> Self {
        Self { status }
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for RebalanceColumn {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let increment = ctx.config().priority_increment;
        let assigned = ctx
            .db()
            .write(|tx| rebalance_column(tx, self.status, increment))?;

        let priorities: Map<String, Value> = assigned
            .iter()
            .map(|(id, priority)| (id.to_string(), Value::from(*priority)))
            .collect();

        Ok(serde_json::json!({
            "status": self.status,
            "count": assigned.len(),
            "priorities": priorities,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KanbanConfig;
    use crate::db;
    use crate::job::AddJob;
    use crate::types::JobId;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_rebalance_column() {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::init_with_config(temp.path().join(".shopfloor"), KanbanConfig::default())
            .await
            .unwrap();

        let mut ids = Vec::new();
        for name in ["A", "B", "C"] {
            let added = AddJob::new(name).execute(&ctx).await.unwrap();
            ids.push(JobId::from_string(added["id"].as_str().unwrap()));
        }
        ctx.db()
            .write(|tx| {
                db::set_priority(tx, &ids[0], 5)?;
                db::set_priority(tx, &ids[1], 6)?;
                db::set_priority(tx, &ids[2], 7)
            })
            .unwrap();

        let result = RebalanceColumn::new(JobStatus::Quoting)
            .execute(&ctx)
            .await
            .unwrap();

        assert_eq!(result["count"], 3);
        assert_eq!(result["priorities"][ids[0].as_str()], 1000);
        assert_eq!(result["priorities"][ids[2].as_str()], 3000);
    }
}
