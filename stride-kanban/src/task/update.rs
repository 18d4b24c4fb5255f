//! UpdateTask command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::ops::{async_trait, Execute, ExecutionResult, Operation, Value};
use crate::types::{LogEntry, MemberId, ProjectId, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Update an existing task's properties.
///
/// A status change through this command keeps the task's stored position -
/// repositioning is the mover's job (`MoveTask`), which is what keeps edits
/// from reshuffling a lane the user never touched.
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateTask {
    /// The task ID to update
    pub id: TaskId,
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New project
    pub project: Option<ProjectId>,
    /// New assignee
    pub assignee: Option<MemberId>,
    /// New lifecycle stage
    pub status: Option<TaskStatus>,
    /// New due date (None = don't change, Some(None) = clear,
    /// Some(Some(x)) = set)
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateTask {
    /// Create a new UpdateTask command
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            project: None,
            assignee: None,
            status: None,
            due_date: None,
        }
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the project
    pub fn with_project(mut self, project: impl Into<ProjectId>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Set the assignee
    pub fn with_assignee(mut self, assignee: impl Into<MemberId>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set or clear the due date
    pub fn with_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

impl Operation for UpdateTask {
    fn verb(&self) -> &'static str {
        "update"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for UpdateTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Value> = async {
            let mut task = ctx.read_task(&self.id).await?;

            if let Some(name) = &self.name {
                if name.trim().is_empty() {
                    return Err(KanbanError::invalid_value("name", "must not be blank"));
                }
                task.name = name.trim().to_string();
            }
            if let Some(description) = &self.description {
                task.description = description.clone();
            }
            if let Some(project) = &self.project {
                task.project = project.clone();
            }
            if let Some(assignee) = &self.assignee {
                task.assignee = assignee.clone();
            }
            if let Some(status) = self.status {
                task.status = status;
            }
            if let Some(due_date) = self.due_date {
                task.due_date = due_date;
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
    use crate::task::AddTask;
    use chrono::TimeZone;
    use tempfile::TempDir;

    async fn setup_with_task() -> (TempDir, KanbanContext, String) {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::new(temp.path().join(".stride"));
        InitBoard::new("Test")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let added = AddTask::new("Original", "ws-1", "proj-1", "alice")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let id = added["id"].as_str().unwrap().to_string();

        (temp, ctx, id)
    }

    #[tokio::test]
    async fn test_update_fields() {
        let (_temp, ctx, id) = setup_with_task().await;

        let result = UpdateTask::new(id.as_str())
            .with_name("Renamed")
            .with_description("More detail")
            .with_assignee("bob")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["name"], "Renamed");
        assert_eq!(result["description"], "More detail");
        assert_eq!(result["assignee"], "bob");
        // Untouched fields survive
        assert_eq!(result["project"], "proj-1");
    }

    #[tokio::test]
    async fn test_status_change_keeps_position() {
        let (_temp, ctx, id) = setup_with_task().await;

        let result = UpdateTask::new(id.as_str())
            .with_status(TaskStatus::Done)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["status"], "DONE");
        assert_eq!(result["position"], 1_000);
    }

    #[tokio::test]
    async fn test_due_date_set_and_clear() {
        let (_temp, ctx, id) = setup_with_task().await;
        let due = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();

        let set = UpdateTask::new(id.as_str())
            .with_due_date(Some(due))
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert!(set["due_date"].is_string());

        let cleared = UpdateTask::new(id.as_str())
            .with_due_date(None)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert!(cleared.get("due_date").is_none());
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let (_temp, ctx, id) = setup_with_task().await;

        let result = UpdateTask::new(id.as_str())
            .with_name("  ")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KanbanError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_update_missing_task() {
        let (_temp, ctx, _id) = setup_with_task().await;

        let result = UpdateTask::new("01NOPE")
            .with_name("x")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KanbanError::TaskNotFound { .. })));
    }
}
