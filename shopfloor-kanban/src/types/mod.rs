//! Core types for the job board

mod ids;
mod job;
mod log;
mod status;

// Re-export all types
pub use ids::{JobId, LogEntryId};
pub use job::Job;
pub use log::LogEntry;
pub use status::JobStatus;
