//! Board-level commands: column views, search and column maintenance

mod active;
mod by_status;
mod check;
mod column;
mod columns;
mod filter;
mod rebalance;
mod search;

pub use active::ListActiveJobs;
pub use by_status::ListJobsByStatus;
pub use check::CheckColumn;
pub use column::GetColumn;
pub use columns::ListColumns;
pub use filter::JobFilter;
pub use rebalance::RebalanceColumn;
pub use search::SearchJobs;

use crate::error::Result;
use crate::job::job_to_json;
use crate::types::Job;
use serde_json::Value;

/// Serialize a list of jobs for command output
pub(crate) fn jobs_to_json(jobs: &[Job]) -> Result<Vec<Value>> {
    jobs.iter().map(job_to_json).collect()
}
