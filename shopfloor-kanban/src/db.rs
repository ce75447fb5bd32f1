//! SQLite-backed job storage
//!
//! One row per job in the `jobs` table; `priority` lives on the row itself,
//! there is no separate ordering table. The connection runs in WAL mode so
//! readers in other processes are not blocked by a writer.
//!
//! Writers go through [`JobDatabase::write`], which opens an immediate
//! transaction: the write lock is taken before the first read, so a
//! read-compute-write sequence (reorder, rebalance) cannot interleave with
//! another writer.
//!
//! The free functions in this module are the data-access layer used by the
//! ordering engine and the read-side commands. They take a `&Connection` so
//! they work both inside and outside a transaction.

use crate::error::{KanbanError, Result};
use crate::types::{Job, JobId, JobStatus};
use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction,
    TransactionBehavior,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Default database filename inside the board directory
pub const DEFAULT_DB_FILENAME: &str = "board.db";

const JOB_COLUMNS: &str = "id, job_number, name, client_name, order_number, description, \
                           status, priority, paid, created_at, updated_at";

/// SQLite database holding the jobs of one board
///
/// The connection is wrapped in a Mutex so the database can be shared across
/// tasks; within one process this serializes all access.
pub struct JobDatabase {
    conn: Mutex<Connection>,
}

impl JobDatabase {
    /// Open (or create) the database at `path`
    pub fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(busy_timeout)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.create_schema()?;
        Ok(db)
    }

    /// Lock the connection. A poisoned mutex still guards a usable connection:
    /// any transaction that was open when the panic happened has been rolled back.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn create_schema(&self) -> Result<()> {
        self.conn().execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id TEXT PRIMARY KEY,
                job_number INTEGER NOT NULL UNIQUE,
                name TEXT NOT NULL,
                client_name TEXT,
                order_number TEXT,
                description TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL,
                priority INTEGER NOT NULL,
                paid INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_jobs_status_priority ON jobs(status, priority);
            CREATE INDEX IF NOT EXISTS idx_jobs_created_at ON jobs(created_at);
            "#,
        )?;
        Ok(())
    }

    /// Run read-only queries against the connection
    pub fn read<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.conn();
        f(&conn)
    }

    /// Run `f` inside an immediate transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back otherwise,
    /// so a failed rebalance or reorder leaves no partial writes behind.
    pub fn write<T>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.conn();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

// =========================================================================
// Row mapping
// =========================================================================

fn row_to_job(row: &Row<'_>) -> rusqlite::Result<Job> {
    let status: String = row.get("status")?;
    let status = status.parse::<JobStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e))
    })?;
    let id: String = row.get("id")?;

    Ok(Job {
        id: JobId::from_string(id),
        job_number: row.get("job_number")?,
        name: row.get("name")?,
        client_name: row.get("client_name")?,
        order_number: row.get("order_number")?,
        description: row.get("description")?,
        status,
        priority: row.get("priority")?,
        paid: row.get("paid")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn query_jobs(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Job>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map(params, row_to_job)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

// =========================================================================
// Single job access
// =========================================================================

/// Insert a new job row
pub fn insert_job(conn: &Connection, job: &Job) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO jobs ({JOB_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
        ),
        params![
            job.id.as_str(),
            job.job_number,
            job.name,
            job.client_name,
            job.order_number,
            job.description,
            job.status.as_str(),
            job.priority,
            job.paid,
            job.created_at,
            job.updated_at,
        ],
    )?;
    Ok(())
}

/// Look up a job by id
pub fn fetch_job(conn: &Connection, id: &JobId) -> Result<Option<Job>> {
    let mut stmt = conn.prepare_cached(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?1"))?;
    Ok(stmt.query_row([id.as_str()], row_to_job).optional()?)
}

/// Look up a job by id, failing with `JobNotFound` if it does not exist
pub fn require_job(conn: &Connection, id: &JobId) -> Result<Job> {
    fetch_job(conn, id)?.ok_or_else(|| KanbanError::job_not_found(id))
}

/// Persist a job's status and priority in one statement
pub fn update_position(
    conn: &Connection,
    id: &JobId,
    status: JobStatus,
    priority: i64,
    updated_at: DateTime<Utc>,
) -> Result<()> {
    let changed = conn.execute(
        "UPDATE jobs SET status = ?1, priority = ?2, updated_at = ?3 WHERE id = ?4",
        params![status.as_str(), priority, updated_at, id.as_str()],
    )?;
    if changed == 0 {
        return Err(KanbanError::job_not_found(id));
    }
    Ok(())
}

/// Overwrite a job's priority only
pub fn set_priority(conn: &Connection, id: &JobId, priority: i64) -> Result<()> {
    conn.execute(
        "UPDATE jobs SET priority = ?1 WHERE id = ?2",
        params![priority, id.as_str()],
    )?;
    Ok(())
}

/// Delete a job row. Returns false if no such job existed.
pub fn delete_job(conn: &Connection, id: &JobId) -> Result<bool> {
    let changed = conn.execute("DELETE FROM jobs WHERE id = ?1", [id.as_str()])?;
    Ok(changed > 0)
}

/// The job number to give the next new job
pub fn next_job_number(conn: &Connection, first: i64) -> Result<i64> {
    let max: Option<i64> = conn.query_row("SELECT MAX(job_number) FROM jobs", [], |row| {
        row.get(0)
    })?;
    Ok(max.map_or(first, |n| (n + 1).max(first)))
}

// =========================================================================
// Status partition queries (ordering engine)
// =========================================================================

/// Highest priority in a status, ignoring `exclude`
pub fn max_priority(
    conn: &Connection,
    status: JobStatus,
    exclude: Option<&JobId>,
) -> Result<Option<i64>> {
    let excluded = exclude.map(|id| id.as_str()).unwrap_or("");
    let max = conn.query_row(
        "SELECT MAX(priority) FROM jobs WHERE status = ?1 AND id != ?2",
        params![status.as_str(), excluded],
        |row| row.get(0),
    )?;
    Ok(max)
}

/// Number of jobs in a status whose priority lies strictly inside the open
/// interval `(lower, upper)`. A missing bound is unbounded.
pub fn count_strictly_between(
    conn: &Connection,
    status: JobStatus,
    lower: Option<i64>,
    upper: Option<i64>,
    exclude: Option<&JobId>,
) -> Result<usize> {
    let excluded = exclude.map(|id| id.as_str()).unwrap_or("");
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM jobs
         WHERE status = ?1 AND id != ?2
           AND (?3 IS NULL OR priority > ?3)
           AND (?4 IS NULL OR priority < ?4)",
        params![status.as_str(), excluded, lower, upper],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

/// Number of jobs in a status holding exactly `priority`, ignoring `exclude`
pub fn count_at_priority(
    conn: &Connection,
    status: JobStatus,
    priority: i64,
    exclude: &[&JobId],
) -> Result<usize> {
    let mut sql = String::from("SELECT COUNT(*) FROM jobs WHERE status = ? AND priority = ?");
    if !exclude.is_empty() {
        sql.push_str(&format!(" AND id NOT IN ({})", placeholders(exclude.len())));
    }
    let mut values: Vec<Value> = vec![status.as_str().to_string().into(), priority.into()];
    values.extend(exclude.iter().map(|id| Value::from(id.as_str().to_string())));

    let count: i64 = conn.query_row(&sql, params_from_iter(values), |row| row.get(0))?;
    Ok(count as usize)
}

/// Whether another job in the status already holds `priority`
pub fn priority_taken(
    conn: &Connection,
    status: JobStatus,
    priority: i64,
    exclude: Option<&JobId>,
) -> Result<bool> {
    let excluded = exclude.map(|id| id.as_str()).unwrap_or("");
    let taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM jobs WHERE status = ?1 AND priority = ?2 AND id != ?3)",
        params![status.as_str(), priority, excluded],
        |row| row.get(0),
    )?;
    Ok(taken)
}

/// Ids of every job in a status, lowest priority first.
///
/// Ties (which only exist in a damaged column) are broken by creation time,
/// then id, so the order is deterministic.
pub fn ids_by_ascending_priority(conn: &Connection, status: JobStatus) -> Result<Vec<JobId>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id FROM jobs WHERE status = ?1 ORDER BY priority ASC, created_at ASC, id ASC",
    )?;
    let rows = stmt.query_map([status.as_str()], |row| {
        row.get::<_, String>(0).map(JobId::from_string)
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Priorities held by more than one job in a status, with the jobs holding them
pub fn duplicate_priorities(
    conn: &Connection,
    status: JobStatus,
) -> Result<BTreeMap<i64, Vec<JobId>>> {
    let mut stmt = conn.prepare_cached(
        "SELECT priority, id FROM jobs
         WHERE status = ?1 AND priority IN (
             SELECT priority FROM jobs WHERE status = ?1 GROUP BY priority HAVING COUNT(*) > 1
         )
         ORDER BY priority, id",
    )?;
    let rows = stmt.query_map([status.as_str()], |row| {
        Ok((row.get::<_, i64>(0)?, JobId::from_string(row.get::<_, String>(1)?)))
    })?;

    let mut duplicates: BTreeMap<i64, Vec<JobId>> = BTreeMap::new();
    for row in rows {
        let (priority, id) = row?;
        duplicates.entry(priority).or_default().push(id);
    }
    Ok(duplicates)
}

// =========================================================================
// Read side
// =========================================================================

/// Jobs in any of `statuses`, highest priority first
pub fn jobs_in_statuses(conn: &Connection, statuses: &[JobStatus]) -> Result<Vec<Job>> {
    if statuses.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {JOB_COLUMNS} FROM jobs WHERE status IN ({})
         ORDER BY priority DESC, created_at DESC, id DESC",
        placeholders(statuses.len())
    );
    query_jobs(conn, &sql, params_from_iter(statuses.iter().map(|s| s.as_str())))
}

/// Jobs in any of `statuses`, newest first, at most `limit` of them
pub fn newest_jobs_in_statuses(
    conn: &Connection,
    statuses: &[JobStatus],
    limit: usize,
) -> Result<Vec<Job>> {
    if statuses.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {JOB_COLUMNS} FROM jobs WHERE status IN ({})
         ORDER BY created_at DESC, id DESC LIMIT {}",
        placeholders(statuses.len()),
        limit
    );
    query_jobs(conn, &sql, params_from_iter(statuses.iter().map(|s| s.as_str())))
}

/// Every job on the board, highest priority first
pub fn all_jobs(conn: &Connection) -> Result<Vec<Job>> {
    query_jobs(
        conn,
        &format!("SELECT {JOB_COLUMNS} FROM jobs ORDER BY priority DESC, created_at DESC, id DESC"),
        [],
    )
}

/// Number of jobs per status
pub fn count_by_status(conn: &Connection) -> Result<BTreeMap<JobStatus, usize>> {
    let mut stmt = conn.prepare_cached("SELECT status, COUNT(*) FROM jobs GROUP BY status")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut counts = BTreeMap::new();
    for row in rows {
        let (status, count) = row?;
        counts.insert(status.parse::<JobStatus>()?, count as usize);
    }
    Ok(counts)
}
