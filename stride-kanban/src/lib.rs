//! Kanban task engine with file-backed storage
//!
//! This crate implements the board logic behind a project-management app:
//! tasks move through a fixed set of lifecycle lanes (`Backlog` through
//! `Done`), ordered within each lane by a sparse integer position key. The
//! heart of the crate is the position reindexer ([`reindex::apply_move`]):
//! it turns one drag-and-drop gesture into a new board layout plus the
//! minimal batch of `{id, status, position}` updates to persist.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use stride_kanban::{board::InitBoard, task::AddTask, Execute, KanbanContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = KanbanContext::new("/path/to/repo/.stride");
//! InitBoard::new("My Project").execute(&ctx).await.into_result()?;
//!
//! let result = AddTask::new("Implement feature X", "ws-1", "proj-1", "alice")
//!     .with_description("Add the new feature")
//!     .execute(&ctx)
//!     .await
//!     .into_result()?;
//!
//! println!("Created task: {}", result["id"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage Structure
//!
//! ```text
//! repo/
//! └── .stride/
//!     ├── board.json           # Board metadata
//!     ├── tasks/
//!     │   ├── {id}.json        # Task document
//!     │   ├── {id}.jsonl       # Per-task operation log (survives delete)
//!     └── activity/
//!         └── current.jsonl    # Global operation log
//! ```
//!
//! Task documents are JSON, one file per task. Operation logs are JSONL,
//! one object per line, read back newest first. Multi-document writers
//! (move, bulk update) hold an advisory file lock for the whole batch.

mod context;
mod error;
mod ops;
mod processor;

pub mod reindex;
pub mod types;

// Command modules
pub mod board;
pub mod task;

pub use context::{KanbanContext, KanbanLock};
pub use error::{KanbanError, Result};
pub use ops::{async_trait, Execute, ExecutionResult, Operation};
pub use processor::KanbanOperationProcessor;

// Re-export commonly used types
pub use reindex::{Slot, TaskPatch};
pub use types::{
    Board, BoardMeta, LogEntry, LogEntryId, MemberId, Position, ProjectId, Task, TaskId,
    TaskStatus, WorkspaceId, POSITION_CEILING, POSITION_STEP,
};
