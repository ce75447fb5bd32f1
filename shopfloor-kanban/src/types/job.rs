//! Job type: a fabrication job card on the board

use super::ids::JobId;
use super::status::JobStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A job card on the board.
///
/// `priority` is the ordering key within the job's status partition; larger
/// values display closer to the top of the column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub job_number: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default)]
    pub description: String,
    pub status: JobStatus,
    pub priority: i64,
    #[serde(default)]
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a new job. Priority and job number are assigned on insert.
    pub fn new(name: impl Into<String>, status: JobStatus) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            job_number: 0,
            name: name.into(),
            client_name: None,
            order_number: None,
            description: String::new(),
            status,
            priority: 0,
            paid: false,
            created_at: now,
            updated_at: now,
        }
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

    /// Case-insensitive match of `term` against the searchable text fields.
    ///
    /// `term` must already be lowercase.
    pub fn matches_term(&self, term: &str) -> bool {
        if self.job_number.to_string() == term {
            return true;
        }
        let fields = [
            Some(self.name.as_str()),
            Some(self.description.as_str()),
            self.client_name.as_deref(),
            self.order_number.as_deref(),
        ];
        fields
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(term))
    }
}
