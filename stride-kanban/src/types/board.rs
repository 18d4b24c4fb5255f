//! Board types: stored metadata and the in-memory lane projection

use super::status::TaskStatus;
use super::task::Task;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Board metadata as stored in `board.json`. Everything else about a board
/// is a projection computed from task documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardMeta {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BoardMeta {
    /// Create board metadata with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// In-memory projection of one workspace's tasks: a lane per status, each
/// lane sorted ascending by position.
///
/// Every status has a lane, empty or not, so display code never has to
/// special-case missing columns.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Board {
    lanes: BTreeMap<TaskStatus, Vec<Task>>,
}

impl Board {
    /// An empty board
    pub fn new() -> Self {
        let lanes = TaskStatus::ALL
            .iter()
            .map(|status| (*status, Vec::new()))
            .collect();
        Self { lanes }
    }

    /// Partition tasks into lanes and sort each lane by position.
    ///
    /// Ties on position (possible in a store written by older clamping
    /// clients) are broken by task id so the projection is deterministic.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut board = Self::new();
        for task in tasks {
            board
                .lanes
                .get_mut(&task.status)
                .expect("every status has a lane")
                .push(task);
        }
        for lane in board.lanes.values_mut() {
            lane.sort_by(|a, b| {
                a.position
                    .cmp(&b.position)
                    .then_with(|| a.id.cmp(&b.id))
            });
        }
        board
    }

    /// Tasks in one lane, ordered by position
    pub fn lane(&self, status: TaskStatus) -> &[Task] {
        self.lanes.get(&status).expect("every status has a lane")
    }

    pub(crate) fn lane_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        self.lanes.get_mut(&status).expect("every status has a lane")
    }

    /// Total number of tasks across all lanes
    pub fn task_count(&self) -> usize {
        self.lanes.values().map(Vec::len).sum()
    }

    /// Per-lane task counts keyed by wire status name
    pub fn lane_counts(&self) -> BTreeMap<String, usize> {
        self.lanes
            .iter()
            .map(|(status, lane)| (status.as_str().to_string(), lane.len()))
            .collect()
    }

    /// Iterate lanes in display order
    pub fn iter_lanes(&self) -> impl Iterator<Item = (TaskStatus, &[Task])> + '_ {
        TaskStatus::ALL
            .into_iter()
            .map(move |status| (status, self.lane(status)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    fn task(name: &str, status: TaskStatus, position: u32) -> Task {
        Task::new(
            name,
            "ws-1",
            "proj-1",
            "member-1",
            status,
            Position::new(position),
        )
    }

    #[test]
    fn test_empty_board_has_all_lanes() {
        let board = Board::new();
        for status in TaskStatus::ALL {
            assert!(board.lane(status).is_empty());
        }
        assert_eq!(board.task_count(), 0);
    }

    #[test]
    fn test_from_tasks_partitions_and_sorts() {
        let board = Board::from_tasks(vec![
            task("c", TaskStatus::Backlog, 3_000),
            task("a", TaskStatus::Backlog, 1_000),
            task("d", TaskStatus::Done, 1_000),
            task("b", TaskStatus::Backlog, 2_000),
        ]);

        let backlog: Vec<&str> = board
            .lane(TaskStatus::Backlog)
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(backlog, vec!["a", "b", "c"]);
        assert_eq!(board.lane(TaskStatus::Done).len(), 1);
        assert_eq!(board.task_count(), 4);
    }

    #[test]
    fn test_lane_counts() {
        let board = Board::from_tasks(vec![
            task("a", TaskStatus::Todo, 1_000),
            task("b", TaskStatus::Todo, 2_000),
        ]);
        let counts = board.lane_counts();
        assert_eq!(counts["TODO"], 2);
        assert_eq!(counts["DONE"], 0);
        assert_eq!(counts.len(), 5);
    }

    #[test]
    fn test_position_ties_broken_by_id() {
        let a = task("a", TaskStatus::Todo, 1_000_000);
        let b = task("b", TaskStatus::Todo, 1_000_000);
        let expected_first = a.id.clone().min(b.id.clone());

        let board = Board::from_tasks(vec![b, a]);
        assert_eq!(board.lane(TaskStatus::Todo)[0].id, expected_first);
    }
}
