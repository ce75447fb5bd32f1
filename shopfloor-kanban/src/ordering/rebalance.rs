//! Column rebalancing: restore even spacing across a whole status column.

use crate::db;
use crate::error::{KanbanError, Result};
use crate::types::{JobId, JobStatus};
use rusqlite::Connection;
use std::collections::HashMap;
use tracing::info;

/// Renumber every job in `status` to `rank * increment`.
///
/// Jobs are ranked from the lowest current priority upwards, so the job at the
/// top of the column receives the largest key and display order is unchanged.
/// Every job is written, even those whose key does not change.
///
/// Must run inside a write transaction: the caller commits all of the new
/// keys or none of them. Returns the new key of every job so callers can
/// re-read neighbours by id.
pub fn rebalance_column(
    conn: &Connection,
    status: JobStatus,
    increment: i64,
) -> Result<HashMap<JobId, i64>> {
    let ids = db::ids_by_ascending_priority(conn, status)?;
    let mut assigned = HashMap::with_capacity(ids.len());

    for (index, id) in ids.into_iter().enumerate() {
        let priority = (index as i64 + 1).checked_mul(increment).ok_or_else(|| {
            KanbanError::invalid_state(status, "column too large to rebalance")
        })?;
        db::set_priority(conn, &id, priority)?;
        assigned.insert(id, priority);
    }

    info!(%status, jobs = assigned.len(), increment, "rebalanced column");
    Ok(assigned)
}
