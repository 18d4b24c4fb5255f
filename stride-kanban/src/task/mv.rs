//! MoveTask command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::ops::{async_trait, Execute, ExecutionResult, Operation, Value};
use crate::reindex::{self, Slot, TaskPatch};
use crate::types::{Board, LogEntry, WorkspaceId};
use serde::{Deserialize, Serialize};

/// Apply one drag-and-drop move to a workspace's board and persist the
/// resulting update batch.
///
/// The batch is written under the store lock so a concurrent writer cannot
/// interleave with a half-applied move. A `None` destination is a cancelled
/// gesture: nothing is written and the result carries an empty batch.
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveTask {
    /// The workspace whose board is being rearranged
    pub workspace: WorkspaceId,
    /// Where the task was picked up
    pub source: Slot,
    /// Where the task was dropped, if anywhere
    pub dest: Option<Slot>,
}

impl MoveTask {
    /// Create a new MoveTask command
    pub fn new(workspace: impl Into<WorkspaceId>, source: Slot, dest: Slot) -> Self {
        Self {
            workspace: workspace.into(),
            source,
            dest: Some(dest),
        }
    }

    /// A gesture that was released outside any lane
    pub fn cancelled(workspace: impl Into<WorkspaceId>, source: Slot) -> Self {
        Self {
            workspace: workspace.into(),
            source,
            dest: None,
        }
    }
}

impl Operation for MoveTask {
    fn verb(&self) -> &'static str {
        "move"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for MoveTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<(Vec<TaskPatch>, bool)> = async {
            let tasks = ctx.read_workspace_tasks(&self.workspace).await?;
            let board = Board::from_tasks(tasks);

            let (board, patches) = reindex::apply_move(board, self.source, self.dest)?;
            if patches.is_empty() {
                return Ok((patches, false));
            }

            let _lock = ctx.lock().await?;
            for patch in &patches {
                let task = board
                    .lane(patch.status)
                    .iter()
                    .find(|task| task.id == patch.id)
                    .expect("patched task is on the board");
                ctx.write_task(task).await?;
            }

            Ok((patches, true))
        }
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok((patches, mutated)) => {
                let value = serde_json::json!({
                    "count": patches.len(),
                    "updates": patches,
                });
                if mutated {
                    ExecutionResult::Logged {
                        value: value.clone(),
                        log_entry: LogEntry::new(
                            self.op_string(),
                            input,
                            value,
                            None,
                            duration_ms,
                        ),
                    }
                } else {
                    // Cancelled or settled gestures change nothing worth
                    // auditing.
                    ExecutionResult::Unlogged { value }
                }
            }
            Err(error) => ExecutionResult::Failed {
                error,
                log_entry: None,
            },
        }
    }
}
