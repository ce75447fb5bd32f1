//! In-memory job filtering for search

use crate::types::{Job, JobStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Split free text into lowercase search terms
pub(crate) fn search_terms(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Search criteria. Every criterion that is set must match; unset criteria
/// match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilter {
    /// Free text; every word must appear in the job number, name,
    /// description, client or order number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Exact job number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_number: Option<i64>,
    /// Case-insensitive substring of the client name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    /// Any of these statuses; empty means all
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<JobStatus>,
    /// Created at or after
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    /// Created at or before
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid: Option<bool>,
}

impl JobFilter {
    /// An empty filter that matches every job
    pub fn new() -> Self {
        Self::default()
    }

    /// Require every word of `query` to match
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Require this exact job number
    pub fn with_job_number(mut self, job_number: i64) -> Self {
        self.job_number = Some(job_number);
        self
    }

    /// Require the client name to contain `client_name`
    pub fn with_client(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = Some(client_name.into());
        self
    }

    /// Add `status` to the allowed statuses
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.statuses.push(status);
        self
    }

    /// Only jobs created at or after `at`
    pub fn created_after(mut self, at: DateTime<Utc>) -> Self {
        self.created_after = Some(at);
        self
    }

    /// Only jobs created at or before `at`
    pub fn created_before(mut self, at: DateTime<Utc>) -> Self {
        self.created_before = Some(at);
        self
    }

    /// Require the paid flag to equal `paid`
    pub fn with_paid(mut self, paid: bool) -> Self {
        self.paid = Some(paid);
        self
    }

    /// Whether `job` satisfies every set criterion
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(number) = self.job_number {
            if job.job_number != number {
                return false;
            }
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&job.status) {
            return false;
        }
        if let Some(paid) = self.paid {
            if job.paid != paid {
                return false;
            }
        }
        if let Some(after) = self.created_after {
            if job.created_at < after {
                return false;
            }
        }
        if let Some(before) = self.created_before {
            if job.created_at > before {
                return false;
            }
        }
        if let Some(client) = &self.client_name {
            let client = client.to_lowercase();
            let matched = job
                .client_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&client));
            if !matched {
                return false;
            }
        }
        if let Some(query) = &self.query {
            if !search_terms(query).iter().all(|term| job.matches_term(term)) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn job() -> Job {
        let mut job = Job::new("Stair Stringers", JobStatus::InProgress)
            .with_client("Harbour Builders")
            .with_order_number("PO-7781")
            .with_description("Galvanised, two flights");
        job.job_number = 1042;
        job
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(JobFilter::new().matches(&job()));
    }

    #[test]
    fn test_query_requires_every_term() {
        assert!(JobFilter::new().with_query("stair galvanised").matches(&job()));
        assert!(JobFilter::new().with_query("po-7781").matches(&job()));
        assert!(JobFilter::new().with_query("1042").matches(&job()));
        assert!(!JobFilter::new().with_query("stair aluminium").matches(&job()));
    }

    #[test]
    fn test_job_number_is_exact() {
        assert!(JobFilter::new().with_job_number(1042).matches(&job()));
        assert!(!JobFilter::new().with_job_number(104).matches(&job()));
    }

    #[test]
    fn test_client_substring() {
        assert!(JobFilter::new().with_client("harbour").matches(&job()));
        assert!(!JobFilter::new().with_client("acme").matches(&job()));

        let no_client = Job::new("Walk-in", JobStatus::Quoting);
        assert!(!JobFilter::new().with_client("harbour").matches(&no_client));
    }

    #[test]
    fn test_status_set_and_paid() {
        let filter = JobFilter::new()
            .with_status(JobStatus::Quoting)
            .with_status(JobStatus::InProgress);
        assert!(filter.matches(&job()));
        assert!(!JobFilter::new().with_status(JobStatus::OnHold).matches(&job()));
        assert!(!JobFilter::new().with_paid(true).matches(&job()));
        assert!(JobFilter::new().with_paid(false).matches(&job()));
    }

    #[test]
    fn test_created_range() {
        let job = job();
        let hour = Duration::hours(1);
        assert!(JobFilter::new()
            .created_after(job.created_at - hour)
            .created_before(job.created_at + hour)
            .matches(&job));
        assert!(!JobFilter::new().created_after(job.created_at + hour).matches(&job));
        assert!(!JobFilter::new().created_before(job.created_at - hour).matches(&job));
    }
}
