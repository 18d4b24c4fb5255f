//! DeleteTask command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::ops::{async_trait, Execute, ExecutionResult, Operation, Value};
use crate::types::{LogEntry, TaskId};
use serde::{Deserialize, Serialize};

/// Delete a task. No cascade: other tasks and entities are untouched, and
/// the task's operation log remains as the audit trail.
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteTask {
    /// The task ID to delete
    pub id: TaskId,
}

impl DeleteTask {
    /// Create a new DeleteTask command
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }
}

impl Operation for DeleteTask {
    fn verb(&self) -> &'static str {
        "delete"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for DeleteTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Value> = async {
            // Surface TaskNotFound before touching the filesystem
            let task = ctx.read_task(&self.id).await?;
            ctx.delete_task_document(&self.id).await?;
            Ok(serde_json::json!({ "id": task.id, "deleted": true }))
        }
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(value) => ExecutionResult::Logged {
                value: value.clone(),
                log_entry: LogEntry::new(self.op_string(), input, value, None, duration_ms),
            },
            Err(error) => ExecutionResult::Failed {
                error,
                log_entry: None,
            },
        }
    }
}
