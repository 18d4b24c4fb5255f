//! AddTask command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::ops::{async_trait, Execute, ExecutionResult, Operation, Value};
use crate::reindex;
use crate::types::{LogEntry, MemberId, ProjectId, Task, TaskStatus, WorkspaceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Add a new task to the board.
///
/// The task lands at the end of its target lane: one position step past the
/// lane's current maximum, or the first slot when the lane is empty.
#[derive(Debug, Deserialize, Serialize)]
pub struct AddTask {
    /// The task name (required, non-blank)
    pub name: String,
    /// The workspace the task belongs to
    pub workspace: WorkspaceId,
    /// The project the task belongs to
    pub project: ProjectId,
    /// The member the task is assigned to
    pub assignee: MemberId,
    /// Target lifecycle stage (defaults to Todo)
    pub status: Option<TaskStatus>,
    /// Due date
    pub due_date: Option<DateTime<Utc>>,
    /// Detailed task description
    pub description: Option<String>,
}

impl AddTask {
    /// Create a new AddTask command
    pub fn new(
        name: impl Into<String>,
        workspace: impl Into<WorkspaceId>,
        project: impl Into<ProjectId>,
        assignee: impl Into<MemberId>,
    ) -> Self {
        Self {
            name: name.into(),
            workspace: workspace.into(),
            project: project.into(),
            assignee: assignee.into(),
            status: None,
            due_date: None,
            description: None,
        }
    }

    /// Set the target status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Operation for AddTask {
    fn verb(&self) -> &'static str {
        "add"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for AddTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Value> = async {
            if self.name.trim().is_empty() {
                return Err(KanbanError::missing_field("name"));
            }
            if !ctx.is_initialized() {
                return Err(KanbanError::NotInitialized {
                    path: ctx.root().to_path_buf(),
                });
            }

            let status = self.status.unwrap_or(TaskStatus::Todo);

            let siblings: Vec<Task> = ctx
                .read_workspace_tasks(&self.workspace)
                .await?
                .into_iter()
                .filter(|task| task.status == status)
                .collect();
            let position = reindex::initial_position(&siblings);

            let mut task = Task::new(
                self.name.trim(),
                self.workspace.clone(),
                self.project.clone(),
                self.assignee.clone(),
                status,
                position,
            );
            if let Some(due_date) = self.due_date {
                task = task.with_due_date(due_date);
            }
            if let Some(description) = &self.description {
                task = task.with_description(description.clone());
            }

            ctx.write_task(&task).await?;
            Ok(serde_json::to_value(&task)?)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::InitBoard;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, KanbanContext) {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::new(temp.path().join(".stride"));

        InitBoard::new("Test")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        (temp, ctx)
    }

    #[tokio::test]
    async fn test_add_task_defaults() {
        let (_temp, ctx) = setup().await;

        let result = AddTask::new("Ship it", "ws-1", "proj-1", "member-1")
            .with_description("Cut the release")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["name"], "Ship it");
        assert_eq!(result["status"], "TODO");
        assert_eq!(result["position"], 1_000);
        assert_eq!(result["description"], "Cut the release");
    }

    #[tokio::test]
    async fn test_add_appends_after_lane_maximum() {
        let (_temp, ctx) = setup().await;

        AddTask::new("one", "ws-1", "proj-1", "member-1")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let second = AddTask::new("two", "ws-1", "proj-1", "member-1")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(second["position"], 2_000);

        // A different lane starts its own keyspace.
        let review = AddTask::new("three", "ws-1", "proj-1", "member-1")
            .with_status(TaskStatus::InReview)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(review["position"], 1_000);
    }

    #[tokio::test]
    async fn test_add_is_workspace_scoped() {
        let (_temp, ctx) = setup().await;

        AddTask::new("one", "ws-1", "proj-1", "member-1")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let other = AddTask::new("two", "ws-2", "proj-1", "member-1")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        // ws-2's Todo lane is empty, so its first task gets the first slot.
        assert_eq!(other["position"], 1_000);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let (_temp, ctx) = setup().await;

        let result = AddTask::new("   ", "ws-1", "proj-1", "member-1")
            .execute(&ctx)
            .await
            .into_result();

        assert!(matches!(result, Err(KanbanError::MissingField { .. })));
    }
}
