//! Reordering: move a job to a new slot, optionally into another status.

use super::calculator::{Placement, PriorityCalculator};
use super::rebalance::rebalance_column;
use crate::db;
use crate::error::{KanbanError, Result};
use crate::types::{Job, JobId, JobStatus};
use chrono::Utc;
use rusqlite::Connection;
use std::collections::HashMap;
use tracing::debug;

/// A requested move
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveRequest<'a> {
    /// Neighbour whose priority the job must exceed
    pub before: Option<&'a JobId>,
    /// Neighbour whose priority the job must stay below
    pub after: Option<&'a JobId>,
    /// New status; `None` keeps the current one
    pub status: Option<JobStatus>,
}

/// Result of a move
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    /// The job as persisted
    pub job: Job,
    /// Status before the move
    pub previous_status: JobStatus,
    /// Priority before the move
    pub previous_priority: i64,
    /// New keys of the target column when it had to be rebalanced
    pub rebalanced: Option<HashMap<JobId, i64>>,
}

/// Orchestrates neighbour lookup, priority calculation, rebalancing and the
/// final write.
///
/// Every method expects to run inside one write transaction (see
/// [`crate::db::JobDatabase::write`]); nothing is committed unless the whole
/// move succeeds.
#[derive(Debug, Clone, Copy)]
pub struct ReorderService {
    calculator: PriorityCalculator,
}

impl ReorderService {
    /// Create a service using the given calculator
    pub fn new(calculator: PriorityCalculator) -> Self {
        Self { calculator }
    }

    /// The calculator in use
    pub fn calculator(&self) -> &PriorityCalculator {
        &self.calculator
    }

    /// Priority for a brand-new job in `status`: above everything already there
    pub fn initial_priority(&self, conn: &Connection, status: JobStatus) -> Result<i64> {
        let column_max = db::max_priority(conn, status, None)?;
        match self.calculator.calculate(None, None, column_max) {
            Placement::At(priority) => Ok(priority),
            Placement::NeedsRebalance => {
                rebalance_column(conn, status, self.calculator.increment())?;
                let column_max = db::max_priority(conn, status, None)?;
                self.calculator
                    .calculate_rebalanced(None, None, column_max)
                    .ok_or_else(|| KanbanError::invalid_state(status, "no room at top of column"))
            }
        }
    }

    /// Move `job_id` between `request.before` and `request.after`, changing
    /// status if requested. Status and priority are written together.
    pub fn move_job(
        &self,
        conn: &Connection,
        job_id: &JobId,
        request: &MoveRequest<'_>,
    ) -> Result<MoveOutcome> {
        let job = db::require_job(conn, job_id)?;
        let target_status = match request.status {
            Some(status) if status != job.status => status,
            _ => job.status,
        };

        let before = self.resolve_neighbour(conn, job_id, request.before, target_status)?;
        let after = self.resolve_neighbour(conn, job_id, request.after, target_status)?;
        self.check_adjacent(conn, job_id, target_status, &before, &after)?;

        let before_priority = before.as_ref().map(|j| j.priority);
        let after_priority = after.as_ref().map(|j| j.priority);
        let column_max = db::max_priority(conn, target_status, Some(job_id))?;

        let mut rebalanced = None;
        let priority = match self
            .calculator
            .calculate(before_priority, after_priority, column_max)
        {
            Placement::At(priority) => priority,
            Placement::NeedsRebalance => {
                let assigned =
                    rebalance_column(conn, target_status, self.calculator.increment())?;
                let priority = self.place_after_rebalance(
                    conn,
                    job_id,
                    target_status,
                    &assigned,
                    before.as_ref().map(|j| &j.id),
                    after.as_ref().map(|j| &j.id),
                )?;
                rebalanced = Some(assigned);
                priority
            }
        };

        if db::priority_taken(conn, target_status, priority, Some(job_id))? {
            return Err(KanbanError::invalid_state(
                target_status,
                format!("priority {priority} is already taken"),
            ));
        }

        let now = Utc::now();
        db::update_position(conn, job_id, target_status, priority, now)?;
        debug!(
            job = %job_id,
            from = %job.status,
            to = %target_status,
            old_priority = job.priority,
            new_priority = priority,
            rebalanced = rebalanced.is_some(),
            "moved job"
        );

        let previous_status = job.status;
        let previous_priority = job.priority;
        let job = Job {
            status: target_status,
            priority,
            updated_at: now,
            ..job
        };

        Ok(MoveOutcome {
            job,
            previous_status,
            previous_priority,
            rebalanced,
        })
    }

    /// Recompute the key from the neighbours' post-rebalance values, looked up
    /// by id in the rebalance result.
    fn place_after_rebalance(
        &self,
        conn: &Connection,
        job_id: &JobId,
        status: JobStatus,
        assigned: &HashMap<JobId, i64>,
        before: Option<&JobId>,
        after: Option<&JobId>,
    ) -> Result<i64> {
        let lookup = |id: Option<&JobId>| -> Result<Option<i64>> {
            id.map(|id| {
                assigned
                    .get(id)
                    .copied()
                    .ok_or_else(|| KanbanError::job_not_found(id))
            })
            .transpose()
        };
        let mut before_priority = lookup(before)?;
        let mut after_priority = lookup(after)?;

        // Neighbours that were tied before the rebalance come back in an
        // arbitrary order; they are still adjacent, so restore key order.
        if let (Some(b), Some(a)) = (before_priority, after_priority) {
            if b > a {
                before_priority = Some(a);
                after_priority = Some(b);
            }
        }

        // A job tied with a neighbour may have been ranked between them
        ensure_nothing_between(conn, job_id, status, before_priority, after_priority)?;

        let column_max = db::max_priority(conn, status, Some(job_id))?;
        self.calculator
            .calculate_rebalanced(before_priority, after_priority, column_max)
            .ok_or_else(|| {
                KanbanError::invalid_state(status, "no room between neighbours after rebalance")
            })
    }

    /// Load a neighbour and check that it can anchor a move into `status`
    fn resolve_neighbour(
        &self,
        conn: &Connection,
        job_id: &JobId,
        neighbour: Option<&JobId>,
        status: JobStatus,
    ) -> Result<Option<Job>> {
        let Some(neighbour_id) = neighbour else {
            return Ok(None);
        };
        if neighbour_id == job_id {
            return Err(KanbanError::invalid_value(
                "neighbour",
                "a job cannot be placed relative to itself",
            ));
        }
        let neighbour = db::require_job(conn, neighbour_id)?;
        if neighbour.status != status {
            return Err(KanbanError::invalid_value(
                "neighbour",
                format!(
                    "job {} is in '{}', not in the target status '{}'",
                    neighbour.id, neighbour.status, status
                ),
            ));
        }
        Ok(Some(neighbour))
    }

    /// Neighbours must be in key order with no other job between them
    fn check_adjacent(
        &self,
        conn: &Connection,
        job_id: &JobId,
        status: JobStatus,
        before: &Option<Job>,
        after: &Option<Job>,
    ) -> Result<()> {
        if before.is_none() && after.is_none() {
            return Ok(());
        }
        let lower = before.as_ref().map(|j| j.priority);
        let upper = after.as_ref().map(|j| j.priority);

        if let (Some(lower), Some(upper)) = (lower, upper) {
            if lower > upper {
                return Err(KanbanError::invalid_value(
                    "neighbour",
                    format!("before ({lower}) has a higher priority than after ({upper})"),
                ));
            }
        }

        if let (Some(b), Some(a)) = (before, after) {
            if b.priority == a.priority {
                // Tied neighbours are only adjacent if nothing else shares their key
                let tied =
                    db::count_at_priority(conn, status, b.priority, &[&b.id, &a.id, job_id])?;
                if tied > 0 {
                    return Err(KanbanError::invalid_value(
                        "neighbour",
                        format!(
                            "neighbours are not adjacent: {tied} other job(s) share priority {}",
                            b.priority
                        ),
                    ));
                }
            }
        }

        ensure_nothing_between(conn, job_id, status, lower, upper)
    }
}

fn ensure_nothing_between(
    conn: &Connection,
    job_id: &JobId,
    status: JobStatus,
    lower: Option<i64>,
    upper: Option<i64>,
) -> Result<()> {
    let between = db::count_strictly_between(conn, status, lower, upper, Some(job_id))?;
    if between > 0 {
        return Err(KanbanError::invalid_value(
            "neighbour",
            format!("neighbours are not adjacent: {between} job(s) lie between them"),
        ));
    }
    Ok(())
}

impl Default for ReorderService {
    fn default() -> Self {
        Self::new(PriorityCalculator::default())
    }
}
