//! Kanban job board engine for a fabrication shop floor
//!
//! Jobs move through a fixed set of statuses, grouped into display columns.
//! Within a status, jobs are ordered by a sparse integer `priority` (highest
//! first) so a drag-and-drop move touches a single row in the common case.
//! When two neighbours leave no room between them the whole column is
//! renumbered inside the same transaction.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use shopfloor_kanban::{KanbanContext, job::{AddJob, ReorderJob}, Execute};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = KanbanContext::init("/path/to/workshop/.shopfloor").await?;
//!
//! let a = AddJob::new("Balustrade").execute(&ctx).await?;
//! let b = AddJob::new("Carport").execute(&ctx).await?;
//! let c = AddJob::new("Gate").execute(&ctx).await?;
//!
//! // Put the gate between the balustrade (below) and the carport (above)
//! ReorderJob::new(c["id"].as_str().unwrap_or_default())
//!     .with_before(a["id"].as_str().unwrap_or_default())
//!     .with_after(b["id"].as_str().unwrap_or_default())
//!     .execute(&ctx)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage Structure
//!
//! ```text
//! workshop/
//! └── .shopfloor/
//!     ├── board.db             # SQLite, one row per job
//!     ├── config.toml          # Optional board configuration
//!     ├── activity/
//!     │   └── current.jsonl    # Global operation log
//!     └── jobs/
//!         └── {id}.jsonl       # Per-job operation log
//! ```
//!
//! Mutating commands run through [`KanbanOperationProcessor`] are written to
//! the operation logs (one JSON object per line, appended).

pub mod columns;
pub mod config;
mod context;
pub mod db;
mod error;
mod operation;
pub mod ordering;
mod processor;
pub mod types;

// Command modules
pub mod job;
pub mod kanban;

pub use columns::{all_columns, ColumnDef, KanbanColumn, StatusBadge};
pub use config::KanbanConfig;
pub use context::{KanbanContext, BOARD_DIR};
pub use error::{KanbanError, Result};
pub use operation::{Execute, ExecutionResult, Operation};
pub use ordering::{Placement, PriorityCalculator, ReorderService};
pub use processor::KanbanOperationProcessor;
pub use types::{Job, JobId, JobStatus, LogEntry, LogEntryId};
