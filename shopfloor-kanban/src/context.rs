//! KanbanContext - storage and configuration access for one board
//!
//! The context owns the open database, the loaded configuration and the
//! paths of the audit logs. It carries no business logic; commands do the
//! work.

use crate::config::KanbanConfig;
use crate::db::{JobDatabase, DEFAULT_DB_FILENAME};
use crate::error::{KanbanError, Result};
use crate::ordering::{PriorityCalculator, ReorderService};
use crate::types::{JobId, LogEntry};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Name of the board directory searched for by [`KanbanContext::find`]
pub const BOARD_DIR: &str = ".shopfloor";

/// Context passed to every command
pub struct KanbanContext {
    /// Path to the board directory
    root: PathBuf,
    config: KanbanConfig,
    db: JobDatabase,
}

impl std::fmt::Debug for KanbanContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KanbanContext")
            .field("root", &self.root)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl KanbanContext {
    /// Open an existing board, loading its configuration
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = KanbanConfig::load(&root)?;
        Self::open_with_config(root, config).await
    }

    /// Open an existing board with an explicit configuration
    pub async fn open_with_config(root: impl Into<PathBuf>, config: KanbanConfig) -> Result<Self> {
        let root = root.into();
        if !root.join(DEFAULT_DB_FILENAME).exists() {
            return Err(KanbanError::NotInitialized { path: root });
        }
        Self::connect(root, config).await
    }

    /// Create a new board directory and database
    pub async fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = KanbanConfig::load(&root)?;
        Self::init_with_config(root, config).await
    }

    /// Create a new board with an explicit configuration
    pub async fn init_with_config(root: impl Into<PathBuf>, config: KanbanConfig) -> Result<Self> {
        let root = root.into();
        if root.join(DEFAULT_DB_FILENAME).exists() {
            return Err(KanbanError::AlreadyExists { path: root });
        }
        fs::create_dir_all(&root).await?;
        let ctx = Self::connect(root, config).await?;
        info!(root = %ctx.root.display(), "initialized board");
        Ok(ctx)
    }

    /// Find the board directory from a starting path, walking up to the
    /// filesystem root, and open it
    pub async fn find(start: impl AsRef<Path>) -> Result<Self> {
        let mut current = start.as_ref().to_path_buf();

        loop {
            let board_dir = current.join(BOARD_DIR);
            if board_dir.is_dir() {
                return Self::open(board_dir).await;
            }

            if !current.pop() {
                return Err(KanbanError::NotInitialized {
                    path: start.as_ref().to_path_buf(),
                });
            }
        }
    }

    async fn connect(root: PathBuf, config: KanbanConfig) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(root.join("activity")).await?;
        fs::create_dir_all(root.join("jobs")).await?;

        let db = JobDatabase::open(
            root.join(DEFAULT_DB_FILENAME),
            Duration::from_millis(config.busy_timeout_ms),
        )?;
        debug!(root = %root.display(), "opened board");
        Ok(Self { root, config, db })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The board directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The loaded configuration
    pub fn config(&self) -> &KanbanConfig {
        &self.config
    }

    /// The job database
    pub fn db(&self) -> &JobDatabase {
        &self.db
    }

    /// Priority calculator using the configured increment
    pub fn calculator(&self) -> PriorityCalculator {
        PriorityCalculator::new(self.config.priority_increment)
    }

    /// Reorder service using the configured increment
    pub fn reorder_service(&self) -> ReorderService {
        ReorderService::new(self.calculator())
    }

    // =========================================================================
    // Path helpers
    // =========================================================================

    /// Path to the SQLite database
    pub fn db_path(&self) -> PathBuf {
        self.root.join(DEFAULT_DB_FILENAME)
    }

    /// Path to the activity directory
    pub fn activity_dir(&self) -> PathBuf {
        self.root.join("activity")
    }

    /// Path to the current activity log
    pub fn activity_path(&self) -> PathBuf {
        self.activity_dir().join("current.jsonl")
    }

    /// Path to a job's log file
    pub fn job_log_path(&self, id: &JobId) -> PathBuf {
        self.root.join("jobs").join(format!("{}.jsonl", id))
    }

    // =========================================================================
    // Activity logging
    // =========================================================================

    /// Append a log entry to the global activity log
    pub async fn append_activity(&self, entry: &LogEntry) -> Result<()> {
        append_log(&self.activity_path(), entry).await
    }

    /// Append a log entry to a job's log
    pub async fn append_job_log(&self, id: &JobId, entry: &LogEntry) -> Result<()> {
        append_log(&self.job_log_path(id), entry).await
    }

    /// Read activity log entries, newest first
    pub async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        read_log(&self.activity_path(), limit).await
    }

    /// Read a job's log entries, newest first
    pub async fn read_job_log(&self, id: &JobId, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        read_log(&self.job_log_path(id), limit).await
    }
}

/// Append a log entry to a JSONL file
async fn append_log(path: &Path, entry: &LogEntry) -> Result<()> {
    let mut line = serde_json::to_string(entry)?;
    line.push('\n');

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;

    file.write_all(line.as_bytes()).await?;
    file.flush().await?;

    Ok(())
}

async fn read_log(path: &Path, limit: Option<usize>) -> Result<Vec<LogEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).await?;
    let mut entries: Vec<LogEntry> = content
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();
    entries.reverse();

    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, KanbanContext) {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::init(temp.path().join(BOARD_DIR))
            .await
            .unwrap();
        (temp, ctx)
    }

    #[tokio::test]
    async fn test_paths() {
        let (temp, ctx) = setup().await;
        let root = temp.path().join(BOARD_DIR);

        assert_eq!(ctx.root(), root);
        assert_eq!(ctx.db_path(), root.join("board.db"));
        assert_eq!(ctx.activity_path(), root.join("activity/current.jsonl"));
        assert_eq!(
            ctx.job_log_path(&JobId::from_string("abc")),
            root.join("jobs/abc.jsonl")
        );
    }

    #[tokio::test]
    async fn test_init_creates_layout() {
        let (_temp, ctx) = setup().await;
        assert!(ctx.db_path().exists());
        assert!(ctx.activity_dir().is_dir());
        assert!(ctx.root().join("jobs").is_dir());
    }

    #[tokio::test]
    async fn test_init_twice_fails() {
        let (_temp, ctx) = setup().await;
        let result = KanbanContext::init(ctx.root()).await;
        assert!(matches!(result, Err(KanbanError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_open_uninitialized_fails() {
        let temp = TempDir::new().unwrap();
        let result = KanbanContext::open(temp.path().join(BOARD_DIR)).await;
        assert!(matches!(result, Err(KanbanError::NotInitialized { .. })));
    }

    #[tokio::test]
    async fn test_find_walks_up() {
        let (temp, _ctx) = setup().await;
        let nested = temp.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        let found = KanbanContext::find(&nested).await.unwrap();
        assert_eq!(found.root(), temp.path().join(BOARD_DIR));
    }

    #[tokio::test]
    async fn test_activity_log_newest_first() {
        let (_temp, ctx) = setup().await;
        for n in 0..3 {
            let entry = LogEntry::success("add job", json!({ "n": n }), json!({}), 1);
            ctx.append_activity(&entry).await.unwrap();
        }

        let entries = ctx.read_activity(Some(2)).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].input["n"], 2);
        assert_eq!(entries[1].input["n"], 1);
    }

    #[tokio::test]
    async fn test_job_log_roundtrip() {
        let (_temp, ctx) = setup().await;
        let id = JobId::from_string("job-1");
        let entry = LogEntry::success("reorder job", json!({ "id": "job-1" }), json!({}), 1);
        ctx.append_job_log(&id, &entry).await.unwrap();

        let entries = ctx.read_job_log(&id, None).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].op, "reorder job");
    }
}
