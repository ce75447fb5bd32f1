//! AddJob command

use super::job_to_json;
use crate::context::KanbanContext;
use crate::db;
use crate::error::{KanbanError, Result};
use crate::operation::{operation, Execute};
use crate::types::{Job, JobStatus};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Create a new job at the top of its status column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddJob {
    /// The job name
    pub name: String,
    /// Initial status (defaults to quoting)
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub paid: bool,
}

operation!(
    AddJob,
    verb = "add",
    noun = "job",
    mutates = true,
    description = "Create a new job"
);

impl AddJob {
    /// Create a new AddJob command in the quoting status
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: JobStatus::default(),
            client_name: None,
            order_number: None,
            description: String::new(),
            paid: false,
        }
    }

    /// Set the initial status
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the client
    pub fn with_client(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = Some(client_name.into());
        self
    }

    /// Set the client's order number
    pub fn with_order_number(mut self, order_number: impl Into<String>) -> Self {
        self.order_number = Some(order_number.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the job as paid
    pub fn paid(mut self, paid: bool) -> Self {
        self.paid = paid;
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for AddJob {
    async fn execute(&self, ctx: &KanbanContext) -> Result<Value> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(KanbanError::missing_field("name"));
        }

        let mut job = Job::new(name, self.status).with_description(&self.description);
        job.client_name = self.client_name.clone();
        job.order_number = self.order_number.clone();
        job.paid = self.paid;

        let service = ctx.reorder_service();
        let first_number = ctx.config().first_job_number;
        let job = ctx.db().write(|tx| {
            job.job_number = db::next_job_number(tx, first_number)?;
            job.priority = service.initial_priority(tx, job.status)?;
            db::insert_job(tx, &job)?;
            Ok(job)
        })?;

        info!(id = %job.id, number = job.job_number, status = %job.status, "added job");
        job_to_json(&job)
    }
}
