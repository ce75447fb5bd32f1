//! Command dispatch: open the board, run the command, format the result.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use shopfloor_kanban::{
    job::{AddJob, ChangeJobStatus, DeleteJob, GetJob, ReorderJob},
    kanban::{
        CheckColumn, GetColumn, JobFilter, ListActiveJobs, ListColumns, ListJobsByStatus,
        RebalanceColumn, SearchJobs,
    },
    KanbanContext, KanbanOperationProcessor, BOARD_DIR,
};
use tracing::debug;

use crate::cli::{Cli, Commands, OutputFormat};

/// Run a parsed command line and return the formatted output
pub async fn run(cli: Cli) -> Result<String> {
    let value = execute(&cli).await?;
    format_output(&value, cli.format)
}

/// Render a result value in the requested format
pub fn format_output(value: &Value, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml_ng::to_string(value)?,
    };
    Ok(rendered)
}

async fn open_board(root: Option<&PathBuf>) -> Result<KanbanContext> {
    let ctx = match root {
        Some(root) => KanbanContext::open(root)
            .await
            .with_context(|| format!("failed to open board at {}", root.display()))?,
        None => {
            let cwd = std::env::current_dir()?;
            KanbanContext::find(&cwd)
                .await
                .with_context(|| format!("no {BOARD_DIR} board found from {}", cwd.display()))?
        }
    };
    debug!(root = %ctx.root().display(), "using board");
    Ok(ctx)
}

async fn init_board(root: Option<&PathBuf>) -> Result<Value> {
    let root = match root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?.join(BOARD_DIR),
    };
    let ctx = KanbanContext::init(&root)
        .await
        .with_context(|| format!("failed to create board at {}", root.display()))?;
    Ok(serde_json::json!({
        "initialized": true,
        "root": ctx.root(),
        "config": ctx.config(),
    }))
}

async fn execute(cli: &Cli) -> Result<Value> {
    if let Commands::Init = cli.command {
        return init_board(cli.root.as_ref()).await;
    }

    let ctx = open_board(cli.root.as_ref()).await?;
    let processor = match &cli.actor {
        Some(actor) => KanbanOperationProcessor::with_actor(actor),
        None => KanbanOperationProcessor::new(),
    };

    let value = match &cli.command {
        Commands::Init => bail!("board already exists at {}", ctx.root().display()),
        Commands::Add {
            name,
            status,
            client,
            order_number,
            description,
            paid,
        } => {
            let mut op = AddJob::new(name)
                .with_status(*status)
                .with_description(description)
                .paid(*paid);
            op.client_name = client.clone();
            op.order_number = order_number.clone();
            processor.process(&op, &ctx).await?
        }
        Commands::Show { id } => processor.process(&GetJob::new(id.as_str()), &ctx).await?,
        Commands::Delete { id } => {
            processor
                .process(&DeleteJob::new(id.as_str()), &ctx)
                .await?
        }
        Commands::Reorder {
            id,
            before,
            after,
            status,
        } => {
            let mut op = ReorderJob::new(id.as_str());
            if let Some(before) = before {
                op = op.with_before(before.as_str());
            }
            if let Some(after) = after {
                op = op.with_after(after.as_str());
            }
            if let Some(status) = status {
                op = op.with_status(*status);
            }
            processor.process(&op, &ctx).await?
        }
        Commands::Status { id, status } => {
            processor
                .process(&ChangeJobStatus::new(id.as_str(), *status), &ctx)
                .await?
        }
        Commands::Rebalance { status } => {
            processor
                .process(&RebalanceColumn::new(*status), &ctx)
                .await?
        }
        Commands::Check { status } => processor.process(&CheckColumn::new(*status), &ctx).await?,
        Commands::Column { column } => processor.process(&GetColumn::new(*column), &ctx).await?,
        Commands::Columns => processor.process(&ListColumns::new(), &ctx).await?,
        Commands::ByStatus {
            status,
            search,
            limit,
        } => {
            let op = ListJobsByStatus {
                status: *status,
                search_terms: search.clone(),
                limit: *limit,
            };
            processor.process(&op, &ctx).await?
        }
        Commands::Search {
            query,
            job_number,
            client,
            statuses,
            created_after,
            created_before,
            paid,
            limit,
        } => {
            let filter = JobFilter {
                query: query.clone(),
                job_number: *job_number,
                client_name: client.clone(),
                statuses: statuses.clone(),
                created_after: *created_after,
                created_before: *created_before,
                paid: *paid,
            };
            let op = SearchJobs {
                filter,
                limit: *limit,
            };
            processor.process(&op, &ctx).await?
        }
        Commands::Active => processor.process(&ListActiveJobs::new(), &ctx).await?,
        Commands::Activity { limit } => {
            let entries = ctx.read_activity(*limit).await?;
            serde_json::to_value(entries)?
        }
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_json() {
        let out = format_output(&json!({"priority": 1500}), OutputFormat::Json).unwrap();
        assert!(out.contains("\"priority\": 1500"));
    }

    #[test]
    fn test_format_yaml() {
        let out = format_output(&json!({"status": "quoting"}), OutputFormat::Yaml).unwrap();
        assert_eq!(out.trim(), "status: quoting");
    }
}
