//! ListTasks command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::ops::{async_trait, Execute, ExecutionResult, Operation, Value};
use crate::types::{MemberId, ProjectId, Task, TaskStatus, WorkspaceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// List a workspace's tasks with optional filters, ordered by status then
/// position. Name search is case-insensitive substring matching.
#[derive(Debug, Deserialize, Serialize)]
pub struct ListTasks {
    /// The workspace to list
    pub workspace: WorkspaceId,
    /// Only tasks in this project
    pub project: Option<ProjectId>,
    /// Only tasks assigned to this member
    pub assignee: Option<MemberId>,
    /// Only tasks in this lifecycle stage
    pub status: Option<TaskStatus>,
    /// Only tasks due at exactly this instant
    pub due_date: Option<DateTime<Utc>>,
    /// Only tasks whose name contains this text
    pub search: Option<String>,
}

impl ListTasks {
    /// Create a new ListTasks command for a workspace
    pub fn new(workspace: impl Into<WorkspaceId>) -> Self {
        Self {
            workspace: workspace.into(),
            project: None,
            assignee: None,
            status: None,
            due_date: None,
            search: None,
        }
    }

    /// Filter by project
    pub fn with_project(mut self, project: impl Into<ProjectId>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Filter by assignee
    pub fn with_assignee(mut self, assignee: impl Into<MemberId>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Filter by status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by due date
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Filter by name substring
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    fn matches(&self, task: &Task) -> bool {
        if let Some(project) = &self.project {
            if &task.project != project {
                return false;
            }
        }
        if let Some(assignee) = &self.assignee {
            if &task.assignee != assignee {
                return false;
            }
        }
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(due_date) = self.due_date {
            if task.due_date != Some(due_date) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !task.name.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}

impl Operation for ListTasks {
    fn verb(&self) -> &'static str {
        "list"
    }
    fn noun(&self) -> &'static str {
        "tasks"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ListTasks {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        match async {
            let mut tasks: Vec<Task> = ctx
                .read_workspace_tasks(&self.workspace)
                .await?
                .into_iter()
                .filter(|task| self.matches(task))
                .collect();

            tasks.sort_by(|a, b| {
                a.status
                    .cmp(&b.status)
                    .then(a.position.cmp(&b.position))
                    .then_with(|| a.id.cmp(&b.id))
            });

            Ok(serde_json::json!({
                "count": tasks.len(),
                "tasks": tasks,
            }))
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
