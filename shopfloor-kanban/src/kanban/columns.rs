//! ListColumns command

use crate::columns::all_columns;
use crate::context::KanbanContext;
use crate::db;
use crate::error::{KanbanError, Result};
use crate::operation::{operation, Execute};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Column metadata for the whole board, with job counts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListColumns {}

operation!(
    ListColumns,
    verb = "list",
    noun = "columns",
    mutates = false,
    description = "List kanban columns with their statuses and job counts"
);

impl ListColumns {
    /// List every column with its job counts
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ListColumns {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let counts = ctx.db().read(db::count_by_status)?;

        let columns: Vec<Value> = all_columns()
            .iter()
            .map(|def| {
                let statuses: Vec<Value> = def
                    .statuses
                    .iter()
                    .map(|status| {
                        let badge = status.badge();
                        json!({
                            "status": status,
                            "label": badge.label,
                            "colour": badge.colour,
                            "count": counts.get(status).copied().unwrap_or(0),
                        })
                    })
                    .collect();
                let count: usize = def
                    .statuses
                    .iter()
                    .filter_map(|status| counts.get(status))
                    .sum();
                json!({
                    "id": def.id,
                    "title": def.title,
                    "colour": def.colour,
                    "count": count,
                    "statuses": statuses,
                })
            })
            .collect();

        Ok(json!({
            "count": columns.len(),
            "columns": columns,
        }))
    }
}
