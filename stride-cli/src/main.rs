//! Stride CLI - kanban board front end.
//!
//! Commands:
//! - `stride init <name>`: Create a `.stride` store in the current directory
//! - `stride board --workspace <id>`: Show a workspace's board projection
//! - `stride add <name> ...`: Create a task
//! - `stride list --workspace <id> [filters]`: List and filter tasks
//! - `stride move ...`: Apply a drag-and-drop move by slot
//! - `stride update <id> ...`: Edit task properties
//! - `stride delete <id>`: Delete a task
//! - `stride bulk-update`: Apply a JSON update batch read from stdin
//! - `stride activity`: Show the operation log, newest first
//!
//! All commands print their result as pretty JSON. Exit code 1 on error.

use std::io::Read;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stride_kanban::{
    board::{GetBoard, InitBoard},
    task::{AddTask, BulkUpdateTasks, DeleteTask, GetTask, ListTasks, MoveTask, UpdateTask},
    KanbanContext, KanbanError, KanbanOperationProcessor, Result, Slot, TaskPatch, TaskStatus,
};

#[derive(Parser)]
#[command(name = "stride", version, about = "Kanban task board")]
struct Cli {
    /// Directory to resolve the .stride store from (default: current dir)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Attribute operations to this actor in the activity log
    #[arg(long, global = true)]
    actor: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new board store
    Init {
        /// The board name
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Show a workspace's board: lanes sorted by position, with counts
    Board {
        #[arg(long)]
        workspace: String,
    },
    /// Create a task at the end of its lane
    Add {
        /// The task name
        name: String,
        #[arg(long)]
        workspace: String,
        #[arg(long)]
        project: String,
        #[arg(long)]
        assignee: String,
        /// Target lane (default: todo)
        #[arg(long)]
        status: Option<TaskStatus>,
        /// Due date, RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Show a single task
    Get {
        /// The task id
        id: String,
    },
    /// List a workspace's tasks with optional filters
    List {
        #[arg(long)]
        workspace: String,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
        /// Due date, RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
        /// Case-insensitive name substring
        #[arg(long)]
        search: Option<String>,
    },
    /// Apply one drag-and-drop move. Omit the destination for a cancelled
    /// gesture (a no-op).
    Move {
        #[arg(long)]
        workspace: String,
        #[arg(long)]
        from_status: TaskStatus,
        #[arg(long)]
        from_index: usize,
        #[arg(long, requires = "to_index")]
        to_status: Option<TaskStatus>,
        #[arg(long, requires = "to_status")]
        to_index: Option<usize>,
    },
    /// Edit a task's properties
    Update {
        /// The task id
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
        /// Due date, RFC 3339 or YYYY-MM-DD
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },
    /// Delete a task
    Delete {
        /// The task id
        id: String,
    },
    /// Apply a JSON batch of {id, status, position} updates read from stdin
    BulkUpdate,
    /// Show the activity log, newest first
    Activity {
        #[arg(long)]
        limit: Option<usize>,
    },
}

/// Parse a due date given as RFC 3339 or as a bare date (midnight UTC)
fn parse_due(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(date) = input.parse::<NaiveDate>() {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(KanbanError::invalid_value(
        "due",
        format!("'{}' is not an RFC 3339 timestamp or YYYY-MM-DD date", input),
    ))
}

async fn run(cli: Cli) -> Result<serde_json::Value> {
    let start_dir = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };

    let processor = match &cli.actor {
        Some(actor) => KanbanOperationProcessor::with_actor(actor.clone()),
        None => KanbanOperationProcessor::new(),
    };

    // `init` creates the store; every other command locates an existing one.
    let ctx = match &cli.command {
        Commands::Init { .. } => KanbanContext::new(start_dir.join(".stride")),
        _ => KanbanContext::find(&start_dir)?,
    };
    tracing::debug!(store = %ctx.root().display(), "resolved store");

    match cli.command {
        Commands::Init { name, description } => {
            let mut op = InitBoard::new(name);
            if let Some(description) = description {
                op = op.with_description(description);
            }
            processor.process(&op, &ctx).await
        }
        Commands::Board { workspace } => processor.process(&GetBoard::new(workspace), &ctx).await,
        Commands::Add {
            name,
            workspace,
            project,
            assignee,
            status,
            due,
            description,
        } => {
            let mut op = AddTask::new(name, workspace, project, assignee);
            if let Some(status) = status {
                op = op.with_status(status);
            }
            if let Some(due) = due {
                op = op.with_due_date(parse_due(&due)?);
            }
            if let Some(description) = description {
                op = op.with_description(description);
            }
            processor.process(&op, &ctx).await
        }
        Commands::Get { id } => processor.process(&GetTask::new(id), &ctx).await,
        Commands::List {
            workspace,
            project,
            assignee,
            status,
            due,
            search,
        } => {
            let mut op = ListTasks::new(workspace);
            if let Some(project) = project {
                op = op.with_project(project);
            }
            if let Some(assignee) = assignee {
                op = op.with_assignee(assignee);
            }
            if let Some(status) = status {
                op = op.with_status(status);
            }
            if let Some(due) = due {
                op = op.with_due_date(parse_due(&due)?);
            }
            if let Some(search) = search {
                op = op.with_search(search);
            }
            processor.process(&op, &ctx).await
        }
        Commands::Move {
            workspace,
            from_status,
            from_index,
            to_status,
            to_index,
        } => {
            let source = Slot::new(from_status, from_index);
            let op = match (to_status, to_index) {
                (Some(status), Some(index)) => {
                    MoveTask::new(workspace, source, Slot::new(status, index))
                }
                _ => MoveTask::cancelled(workspace, source),
            };
            processor.process(&op, &ctx).await
        }
        Commands::Update {
            id,
            name,
            description,
            project,
            assignee,
            status,
            due,
            clear_due,
        } => {
            let mut op = UpdateTask::new(id);
            if let Some(name) = name {
                op = op.with_name(name);
            }
            if let Some(description) = description {
                op = op.with_description(description);
            }
            if let Some(project) = project {
                op = op.with_project(project);
            }
            if let Some(assignee) = assignee {
                op = op.with_assignee(assignee);
            }
            if let Some(status) = status {
                op = op.with_status(status);
            }
            if let Some(due) = due {
                op = op.with_due_date(Some(parse_due(&due)?));
            } else if clear_due {
                op = op.with_due_date(None);
            }
            processor.process(&op, &ctx).await
        }
        Commands::Delete { id } => processor.process(&DeleteTask::new(id), &ctx).await,
        Commands::BulkUpdate => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            let updates: Vec<TaskPatch> = serde_json::from_str(&input)?;
            processor.process(&BulkUpdateTasks::new(updates), &ctx).await
        }
        Commands::Activity { limit } => {
            let entries = ctx.read_activity(limit).await?;
            Ok(serde_json::to_value(entries)?)
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("stride=debug,stride_kanban=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(rendered) => println!("{}", rendered),
            Err(err) => {
                eprintln!("error: {}", err);
                std::process::exit(1);
            }
        },
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    }
}
