//! Core types for the kanban engine

mod board;
mod ids;
mod log;
mod position;
mod status;
mod task;

// Re-export all types
pub use board::{Board, BoardMeta};
pub use ids::{LogEntryId, MemberId, ProjectId, TaskId, WorkspaceId};
pub use log::LogEntry;
pub use position::{Position, POSITION_CEILING, POSITION_STEP};
pub use status::TaskStatus;
pub use task::Task;
