//! Error types for the kanban engine

use std::path::PathBuf;
use thiserror::Error;

/// Result type for kanban operations
pub type Result<T> = std::result::Result<T, KanbanError>;

/// Errors that can occur in kanban operations
#[derive(Debug, Error)]
pub enum KanbanError {
    /// Board not initialized at the given path
    #[error("board not initialized at {path}")]
    NotInitialized { path: PathBuf },

    /// Board already exists
    #[error("board already exists at {path}")]
    AlreadyExists { path: PathBuf },

    /// Task not found
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// A drag event referenced a slot that does not exist on the board
    #[error("invalid move: {reason}")]
    InvalidMove { reason: String },

    /// A position fell outside the persistable range
    #[error("position {position} outside the 1000..=1000000 range")]
    PositionOutOfRange { position: u32 },

    /// A column grew past the number of distinct positions the keyspace holds
    #[error("column of {count} tasks exhausts the position keyspace")]
    KeyspaceExhausted { count: usize },

    /// A batch referenced tasks from more than one workspace
    #[error("all tasks in a batch must belong to the same workspace")]
    WorkspaceMismatch,

    /// Missing required field
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Lock is held by another process
    #[error("lock busy - another operation in progress")]
    LockBusy,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KanbanError {
    /// Create an invalid move error
    pub fn invalid_move(reason: impl Into<String>) -> Self {
        Self::InvalidMove {
            reason: reason.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy)
    }
}
