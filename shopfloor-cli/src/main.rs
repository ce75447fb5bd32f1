//! Shopfloor CLI - kanban job board for a fabrication workshop.
//!
//! Commands:
//! - `shopfloor init`: Create a board in ./.shopfloor
//! - `shopfloor add <name>`: Add a job at the top of its status column
//! - `shopfloor show <id>` / `shopfloor delete <id>`
//! - `shopfloor reorder <id> [--before ID] [--after ID] [--status STATUS]`
//! - `shopfloor status <id> <status>`: Change a job's status
//! - `shopfloor rebalance <status>` / `shopfloor check <status>`
//! - `shopfloor column <column>` / `shopfloor columns`
//! - `shopfloor by-status <status>` / `shopfloor search [query]` / `shopfloor active`
//! - `shopfloor activity`: Show the activity log
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error
//! - 75: Another writer held the board for too long; retry

use clap::Parser;
use shopfloor_kanban::KanbanError;
use tracing_subscriber::EnvFilter;

use shopfloor_cli::{run, Cli};

/// Exit code for a retryable failure (EX_TEMPFAIL)
const EXIT_TEMPFAIL: i32 = 75;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("shopfloor_kanban=debug,shopfloor_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let retryable = e
                .downcast_ref::<KanbanError>()
                .is_some_and(KanbanError::is_retryable);
            if retryable {
                EXIT_TEMPFAIL
            } else {
                1
            }
        }
    };

    std::process::exit(exit_code);
}
