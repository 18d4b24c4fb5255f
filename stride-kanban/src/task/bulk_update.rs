//! BulkUpdateTasks command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::ops::{async_trait, Execute, ExecutionResult, Operation, Value};
use crate::reindex::TaskPatch;
use crate::types::{LogEntry, Task};
use serde::{Deserialize, Serialize};

/// Apply a batch of `{id, status, position}` updates, one per task.
///
/// This is the persistence half of the drag-and-drop contract: positions
/// must lie in the persistable range, every referenced task must exist, and
/// the whole batch must stay inside a single workspace. The batch is
/// validated before anything is written, then applied under the store lock.
#[derive(Debug, Deserialize, Serialize)]
pub struct BulkUpdateTasks {
    /// The updates to apply
    pub updates: Vec<TaskPatch>,
}

impl BulkUpdateTasks {
    /// Create a new BulkUpdateTasks command
    pub fn new(updates: Vec<TaskPatch>) -> Self {
        Self { updates }
    }
}

impl Operation for BulkUpdateTasks {
    fn verb(&self) -> &'static str {
        "bulk-update"
    }
    fn noun(&self) -> &'static str {
        "tasks"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for BulkUpdateTasks {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Vec<Task>> = async {
            for patch in &self.updates {
                if !patch.position.in_bounds() {
                    return Err(KanbanError::PositionOutOfRange {
                        position: patch.position.get(),
                    });
                }
            }

            let mut tasks = Vec::with_capacity(self.updates.len());
            for patch in &self.updates {
                tasks.push(ctx.read_task(&patch.id).await?);
            }

            if tasks
                .windows(2)
                .any(|pair| pair[0].workspace != pair[1].workspace)
            {
                return Err(KanbanError::WorkspaceMismatch);
            }

            if tasks.is_empty() {
                return Ok(tasks);
            }

            let _lock = ctx.lock().await?;
            for (task, patch) in tasks.iter_mut().zip(&self.updates) {
                task.status = patch.status;
                task.position = patch.position;
                ctx.write_task(task).await?;
            }

            Ok(tasks)
        }
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(tasks) => {
                let value = serde_json::json!({
                    "count": tasks.len(),
                    "tasks": tasks,
                });
                if tasks.is_empty() {
                    ExecutionResult::Unlogged { value }
                } else {
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
                }
            }
            Err(error) => ExecutionResult::Failed {
                error,
                log_entry: None,
            },
        }
    }
}
