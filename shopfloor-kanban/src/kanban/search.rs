//! SearchJobs command

use super::filter::JobFilter;
use super::jobs_to_json;
use crate::context::KanbanContext;
use crate::db;
use crate::error::{KanbanError, Result};
use crate::operation::{operation, Execute};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Search the whole board. Results are newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchJobs {
    #[serde(flatten)]
    pub filter: JobFilter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

operation!(
    SearchJobs,
    verb = "search",
    noun = "jobs",
    mutates = false,
    description = "Search jobs by text, number, client, status, date and payment"
);

impl SearchJobs {
    /// Search with `filter` and no limit
    pub fn new(filter: JobFilter) -> Self {
        Self {
            filter,
            limit: None,
        }
    }

    /// Return at most `limit` jobs
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for SearchJobs {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let mut jobs = ctx.db().read(db::all_jobs)?;
        let total = jobs.len();

        jobs.retain(|job| self.filter.matches(job));
        jobs.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        if let Some(limit) = self.limit {
            jobs.truncate(limit);
        }
        debug!(total, matched = jobs.len(), "searched jobs");

        Ok(serde_json::json!({
            "count": jobs.len(),
            "jobs": jobs_to_json(&jobs)?,
        }))
    }
}
