//! Position reindexing for drag-and-drop moves
//!
//! Translates a single move gesture (task leaves one slot, lands in
//! another) into a new board layout plus the minimal batch of
//! `{id, status, position}` updates to persist. Pure and synchronous: the
//! caller owns persistence of the returned batch and any rollback policy.

use crate::error::{KanbanError, Result};
use crate::types::{
    Board, Position, Task, TaskId, TaskStatus, POSITION_CEILING, POSITION_STEP,
};
use serde::{Deserialize, Serialize};

/// A cell on the board: a status lane plus a zero-based index within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub status: TaskStatus,
    pub index: usize,
}

impl Slot {
    /// Create a slot
    pub fn new(status: TaskStatus, index: usize) -> Self {
        Self { status, index }
    }
}

/// One persistence update produced by a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub id: TaskId,
    pub status: TaskStatus,
    pub position: Position,
}

/// Apply one drag-and-drop move to the board.
///
/// Removes the task at `source`, inserts it at `dest` (updating its status
/// when the move crosses lanes), assigns the slot position
/// `min((index + 1) * 1000, 1_000_000)` to the moved task, and repairs any
/// sibling whose stored position no longer matches its slot. The returned
/// batch contains exactly the tasks whose status or position changed
/// relative to the board before the move, each task at most once.
///
/// A `None` destination models a cancelled gesture (dropped outside any
/// lane) and returns the board unchanged with an empty batch. A `source`
/// or `dest` index that does not exist on the board is an `InvalidMove`
/// error: it means the caller's view has desynchronized from the board.
pub fn apply_move(
    mut board: Board,
    source: Slot,
    dest: Option<Slot>,
) -> Result<(Board, Vec<TaskPatch>)> {
    let Some(dest) = dest else {
        return Ok((board, Vec::new()));
    };

    let source_len = board.lane(source.status).len();
    if source.index >= source_len {
        return Err(KanbanError::invalid_move(format!(
            "source index {} out of range for {} ({} tasks)",
            source.index, source.status, source_len
        )));
    }

    let crossed = source.status != dest.status;
    // Insertion happens after removal, so a same-lane move has one slot less
    // to aim at than the lane currently holds.
    let dest_cap = if crossed {
        board.lane(dest.status).len()
    } else {
        source_len - 1
    };
    if dest.index > dest_cap {
        return Err(KanbanError::invalid_move(format!(
            "destination index {} out of range for {} ({} tasks)",
            dest.index, dest.status, dest_cap
        )));
    }

    let mut task = board.lane_mut(source.status).remove(source.index);
    let moved_id = task.id.clone();
    if crossed {
        task.status = dest.status;
    }
    board.lane_mut(dest.status).insert(dest.index, task);

    let mut patches = repair_lane(
        board.lane_mut(dest.status),
        Some(&moved_id).filter(|_| crossed),
    )?;
    if crossed {
        patches.extend(repair_lane(board.lane_mut(source.status), None)?);
    }

    tracing::debug!(
        source = %source.status,
        dest = %dest.status,
        updates = patches.len(),
        "applied move"
    );

    Ok((board, patches))
}

/// Compute the initial position for a task created into a column, given the
/// column's current maximum: one step past it, or the first slot when the
/// column is empty.
pub fn initial_position(lane: &[Task]) -> Position {
    lane.iter()
        .map(|task| task.position)
        .max()
        .map(Position::after)
        .unwrap_or_else(Position::first)
}

/// Rewrite a lane's positions to their target values, collecting a patch
/// for every task whose stored position differs. `status_changed` names the
/// one task (the cross-lane mover) that needs a patch even when its
/// position happens to already match.
fn repair_lane(lane: &mut [Task], status_changed: Option<&TaskId>) -> Result<Vec<TaskPatch>> {
    let targets = lane_targets(lane.len())?;
    let mut patches = Vec::new();

    for (task, target) in lane.iter_mut().zip(targets) {
        let position_changed = task.position != target;
        let needs_patch =
            position_changed || status_changed.is_some_and(|id| id == &task.id);
        if position_changed {
            task.position = target;
        }
        if needs_patch {
            patches.push(TaskPatch {
                id: task.id.clone(),
                status: task.status,
                position: task.position,
            });
        }
    }

    Ok(patches)
}

/// Target positions for a lane of `len` tasks.
///
/// The stepped slot values collide at the ceiling once a lane outgrows
/// `POSITION_CEILING / POSITION_STEP` tasks; past that point the whole lane
/// is renumbered with even spacing across the keyspace, which keeps values
/// distinct and increasing up to 999,001 tasks per lane.
fn lane_targets(len: usize) -> Result<Vec<Position>> {
    if len <= (POSITION_CEILING / POSITION_STEP) as usize {
        return Ok((0..len).map(Position::slot).collect());
    }

    let span = (POSITION_CEILING - POSITION_STEP) as u64;
    if len as u64 > span + 1 {
        return Err(KanbanError::KeyspaceExhausted { count: len });
    }

    let step = span / (len as u64 - 1);
    Ok((0..len as u64)
        .map(|i| Position::new((POSITION_STEP as u64 + i * step) as u32))
        .collect())
}
