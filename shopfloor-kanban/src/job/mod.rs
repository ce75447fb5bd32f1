//! Job commands

mod add;
mod delete;
mod get;
mod reorder;
mod status;

pub use add::AddJob;
pub use delete::DeleteJob;
pub use get::GetJob;
pub use reorder::ReorderJob;
pub use status::ChangeJobStatus;

use crate::error::Result;
use crate::types::Job;
use serde_json::Value;

/// Serialize a job for command output, adding its column and badge
pub(crate) fn job_to_json(job: &Job) -> Result<Value> {
    let mut value = serde_json::to_value(job)?;
    if let Value::Object(map) = &mut value {
        map.insert("column".into(), serde_json::to_value(job.status.column())?);
        map.insert("badge".into(), serde_json::to_value(job.status.badge())?);
    }
    Ok(value)
}
