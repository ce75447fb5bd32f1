//! Job status enumeration

use crate::error::KanbanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fine-grained workflow state of a job.
///
/// Each status is its own priority partition: priorities are unique among the
/// jobs sharing a status, not across the whole board.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Quoting,
    AcceptedQuote,
    AwaitingMaterials,
    AwaitingStaff,
    AwaitingSiteAvailability,
    InProgress,
    OnHold,
    Special,
    RecentlyCompleted,
    Completed,
    Rejected,
    Archived,
}

impl JobStatus {
    /// Every status, in workflow order
    pub const ALL: [JobStatus; 12] = [
        JobStatus::Quoting,
        JobStatus::AcceptedQuote,
        JobStatus::AwaitingMaterials,
        JobStatus::AwaitingStaff,
        JobStatus::AwaitingSiteAvailability,
        JobStatus::InProgress,
        JobStatus::OnHold,
        JobStatus::Special,
        JobStatus::RecentlyCompleted,
        JobStatus::Completed,
        JobStatus::Rejected,
        JobStatus::Archived,
    ];

    /// The storage key of this status
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Quoting => "quoting",
            JobStatus::AcceptedQuote => "accepted_quote",
            JobStatus::AwaitingMaterials => "awaiting_materials",
            JobStatus::AwaitingStaff => "awaiting_staff",
            JobStatus::AwaitingSiteAvailability => "awaiting_site_availability",
            JobStatus::InProgress => "in_progress",
            JobStatus::OnHold => "on_hold",
            JobStatus::Special => "special",
            JobStatus::RecentlyCompleted => "recently_completed",
            JobStatus::Completed => "completed",
            JobStatus::Rejected => "rejected",
            JobStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = KanbanError;

    /// Parse a status key. Accepts kebab-case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        JobStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| KanbanError::UnknownStatus {
                value: s.to_string(),
            })
    }
}
