//! ListJobsByStatus command

use super::filter::search_terms;
use super::jobs_to_json;
use crate::context::KanbanContext;
use crate::db;
use crate::error::{KanbanError, Result};
use crate::operation::{operation, Execute};
use crate::types::JobStatus;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Jobs in one status, highest priority first, optionally filtered by text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListJobsByStatus {
    pub status: JobStatus,
    /// Whitespace-separated words that must all match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_terms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

operation!(
    ListJobsByStatus,
    verb = "list",
    noun = "jobs",
    mutates = false,
    description = "List the jobs in a status"
);

impl ListJobsByStatus {
    /// List every job in `status`
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            search_terms: None,
            limit: None,
        }
    }

    /// Keep only jobs matching every word of `terms`
    pub fn with_search(mut self, terms: impl Into<String>) -> Self {
        self.search_terms = Some(terms.into());
        self
    }

    /// Return at most `limit` jobs
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ListJobsByStatus {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let mut jobs = ctx
            .db()
            .read(|conn| db::jobs_in_statuses(conn, &[self.status]))?;

        if let Some(text) = &self.search_terms {
            let terms = search_terms(text);
            jobs.retain(|job| terms.iter().all(|term| job.matches_term(term)));
        }
        if let Some(limit) = self.limit {
            jobs.truncate(limit);
        }

        Ok(serde_json::json!({
            "status": self.status,
            "count": jobs.len(),
            "jobs": jobs_to_json(&jobs)?,
        }))
    }
}
