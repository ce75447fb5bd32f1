//! CLI definition for the shopfloor command-line interface.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use shopfloor_kanban::{JobStatus, KanbanColumn};

/// Shopfloor - kanban job board for a fabrication workshop.
///
/// The board lives in a `.shopfloor` directory, found by walking up from the
/// current directory unless `--root` is given.
#[derive(Parser, Debug)]
#[command(name = "shopfloor")]
#[command(version)]
#[command(about = "Kanban job board for a fabrication workshop")]
#[command(
    long_about = "Shopfloor keeps the workshop's jobs in priority-ordered kanban columns.\n\n\
    Within a status, jobs are ordered highest priority first. `reorder` places a job \
    between two neighbours: --after names the job shown directly above it, --before \
    the job shown directly below it.\n\n\
    Environment variables:\n  \
    SHOPFLOOR_PRIORITY_INCREMENT  Spacing between priorities (default 1000)\n  \
    SHOPFLOOR_ARCHIVED_PAGE_SIZE  Jobs shown in the archived column (default 50)\n  \
    SHOPFLOOR_BUSY_TIMEOUT_MS     Wait for another writer before giving up (default 5000)\n  \
    RUST_LOG                      Log filter (e.g. shopfloor_kanban=debug)"
)]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Board directory (defaults to the nearest .shopfloor)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Name recorded in the activity log
    #[arg(long, global = true, value_name = "NAME")]
    pub actor: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new board in ./.shopfloor (or --root)
    Init,

    /// Add a job at the top of its status column
    Add {
        /// Job name
        name: String,
        /// Initial status
        #[arg(long, default_value = "quoting")]
        status: JobStatus,
        /// Client name
        #[arg(long)]
        client: Option<String>,
        /// Client's order number
        #[arg(long)]
        order_number: Option<String>,
        /// Job description
        #[arg(long, default_value = "")]
        description: String,
        /// Mark the job as paid
        #[arg(long)]
        paid: bool,
    },

    /// Show a job
    Show {
        /// Job ID
        id: String,
    },

    /// Delete a job
    Delete {
        /// Job ID
        id: String,
    },

    /// Move a job between two neighbours, optionally into another status
    Reorder {
        /// Job ID
        id: String,
        /// Job that ends up directly below
        #[arg(long)]
        before: Option<String>,
        /// Job that ends up directly above
        #[arg(long)]
        after: Option<String>,
        /// Move into this status
        #[arg(long)]
        status: Option<JobStatus>,
    },

    /// Change a job's status (it goes to the top of the new column)
    Status {
        /// Job ID
        id: String,
        /// New status
        status: JobStatus,
    },

    /// Renumber a status column to evenly spaced priorities
    Rebalance {
        status: JobStatus,
    },

    /// Report duplicate priorities in a status column
    Check {
        status: JobStatus,
    },

    /// List the jobs in a kanban column
    Column {
        /// Column (pre_production, in_production, on_hold, special, finished, archived)
        column: KanbanColumn,
    },

    /// List kanban columns with job counts
    Columns,

    /// List the jobs in one status
    ByStatus {
        status: JobStatus,
        /// Words that must all appear in the job
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search every job on the board
    Search {
        /// Free-text query
        query: Option<String>,
        /// Exact job number
        #[arg(long)]
        job_number: Option<i64>,
        /// Client name contains
        #[arg(long)]
        client: Option<String>,
        /// Restrict to these statuses (repeatable)
        #[arg(long = "status")]
        statuses: Vec<JobStatus>,
        /// Created at or after (RFC 3339)
        #[arg(long)]
        created_after: Option<DateTime<Utc>>,
        /// Created at or before (RFC 3339)
        #[arg(long)]
        created_before: Option<DateTime<Utc>>,
        /// Paid flag
        #[arg(long)]
        paid: Option<bool>,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List every job that is not archived
    Active,

    /// Show the activity log, newest first
    Activity {
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reorder() {
        let cli = Cli::parse_from([
            "shopfloor",
            "reorder",
            "job-1",
            "--after",
            "job-2",
            "--status",
            "in-progress",
        ]);
        match cli.command {
            Commands::Reorder {
                id,
                before,
                after,
                status,
            } => {
                assert_eq!(id, "job-1");
                assert_eq!(before, None);
                assert_eq!(after.as_deref(), Some("job-2"));
                assert_eq!(status, Some(JobStatus::InProgress));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "shopfloor",
            "columns",
            "--format",
            "yaml",
            "--actor",
            "planner",
            "--root",
            "/tmp/board",
        ]);
        assert_eq!(cli.format, OutputFormat::Yaml);
        assert_eq!(cli.actor.as_deref(), Some("planner"));
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/board")));
        assert!(matches!(cli.command, Commands::Columns));
    }

    #[test]
    fn test_parse_search_with_repeated_status() {
        let cli = Cli::parse_from([
            "shopfloor",
            "search",
            "gate",
            "--status",
            "quoting",
            "--status",
            "on_hold",
            "--paid",
            "false",
        ]);
        match cli.command {
            Commands::Search {
                query,
                statuses,
                paid,
                ..
            } => {
                assert_eq!(query.as_deref(), Some("gate"));
                assert_eq!(statuses, vec![JobStatus::Quoting, JobStatus::OnHold]);
                assert_eq!(paid, Some(false));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        let result = Cli::try_parse_from(["shopfloor", "rebalance", "backlog"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verify_command() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
