//! Task document type

use super::ids::{MemberId, ProjectId, TaskId, WorkspaceId};
use super::position::Position;
use super::status::TaskStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task/card on the kanban board.
///
/// Stored one document per task. The workspace, project and assignee fields
/// are opaque references managed by the surrounding application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub status: TaskStatus,

    /// Sort key within the status column
    pub position: Position,

    pub workspace: WorkspaceId,
    pub project: ProjectId,
    pub assignee: MemberId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub description: String,
}

impl Task {
    /// Create a new task with a generated id
    pub fn new(
        name: impl Into<String>,
        workspace: impl Into<WorkspaceId>,
        project: impl Into<ProjectId>,
        assignee: impl Into<MemberId>,
        status: TaskStatus,
        position: Position,
    ) -> Self {
        Self {
            id: TaskId::new(),
            name: name.into(),
            status,
            position,
            workspace: workspace.into(),
            project: project.into(),
            assignee: assignee.into(),
            due_date: None,
            description: String::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}
