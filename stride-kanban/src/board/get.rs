//! GetBoard command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::ops::{async_trait, Execute, ExecutionResult, Operation, Value};
use crate::types::{Board, WorkspaceId};
use serde::{Deserialize, Serialize};

/// Get one workspace's board: lanes in display order, each sorted by
/// position, plus per-lane task counts
#[derive(Debug, Deserialize, Serialize)]
pub struct GetBoard {
    /// The workspace to project
    pub workspace: WorkspaceId,
}

impl GetBoard {
    /// Create a new GetBoard command
    pub fn new(workspace: impl Into<WorkspaceId>) -> Self {
        Self {
            workspace: workspace.into(),
        }
    }
}

impl Operation for GetBoard {
    fn verb(&self) -> &'static str {
        "get"
    }
    fn noun(&self) -> &'static str {
        "board"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for GetBoard {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        match async {
            let meta = ctx.read_board_meta().await?;
            let tasks = ctx.read_workspace_tasks(&self.workspace).await?;
            let board = Board::from_tasks(tasks);

            let mut result = serde_json::to_value(&meta)?;
            result["workspace"] = serde_json::to_value(&self.workspace)?;
            result["task_counts"] = serde_json::to_value(board.lane_counts())?;
            result["lanes"] = serde_json::to_value(&board)?;

            Ok(result)
        }
        .await
        {
            Ok(value) => ExecutionResult::Unlogged { value },
            Err(error) => ExecutionResult::Failed {
                error,
                log_entry: None,
            },
        }
    }
}
