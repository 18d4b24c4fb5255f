//! GetTask command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::ops::{async_trait, Execute, ExecutionResult, Operation, Value};
use crate::types::TaskId;
use serde::{Deserialize, Serialize};

/// Retrieve a single task by id
#[derive(Debug, Deserialize, Serialize)]
pub struct GetTask {
    /// The task ID to fetch
    pub id: TaskId,
}

impl GetTask {
    /// Create a new GetTask command
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }
}

impl Operation for GetTask {
    fn verb(&self) -> &'static str {
        "get"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for GetTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        match async {
            let task = ctx.read_task(&self.id).await?;
            Ok(serde_json::to_value(&task)?)
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
