//! The fixed task lifecycle stages

use crate::error::KanbanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of a task. Doubles as the board column the task sits in.
///
/// The set is fixed and the variants are ordered for display only - there is
/// no enforced forward-only transition, a task may move between any two
/// stages. Wire names are SCREAMING_SNAKE (`BACKLOG`, `IN_PROGRESS`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Backlog,
    Todo,
    InProgress,
    InReview,
    Done,
}

impl TaskStatus {
    /// All stages in display order
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Backlog,
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::InReview,
        TaskStatus::Done,
    ];

    /// The wire name of this stage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "BACKLOG",
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::InReview => "IN_REVIEW",
            TaskStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = KanbanError;

    /// Parse a stage name. Case-insensitive, `-` and `_` interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "BACKLOG" => Ok(TaskStatus::Backlog),
            "TODO" | "TO_DO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "IN_REVIEW" => Ok(TaskStatus::InReview),
            "DONE" => Ok(TaskStatus::Done),
            _ => Err(KanbanError::invalid_value(
                "status",
                format!("unknown status '{}'", s),
            )),
        }
    }
}
