//! Integer sort keys for intra-column task ordering
//!
//! Positions form a sparse keyspace: new tasks land a full step apart so a
//! single-item move usually touches only the moved task, not every sibling.

use serde::{Deserialize, Serialize};

/// Spacing between adjacent slot positions
pub const POSITION_STEP: u32 = 1_000;

/// Largest persistable position value
pub const POSITION_CEILING: u32 = 1_000_000;

/// A task's sort key within its status column.
///
/// Valid persisted values lie in `[POSITION_STEP, POSITION_CEILING]`.
/// Ordering within a column is ascending by this value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Position(u32);

impl Position {
    /// Wrap a raw position value
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// The raw position value
    pub fn get(self) -> u32 {
        self.0
    }

    /// Position for the first task in an empty column
    pub fn first() -> Self {
        Self(POSITION_STEP)
    }

    /// The canonical slot value for a zero-based column index:
    /// `min((index + 1) * 1000, 1_000_000)`
    pub fn slot(index: usize) -> Self {
        let value = (index as u64 + 1) * POSITION_STEP as u64;
        Self(value.min(POSITION_CEILING as u64) as u32)
    }

    /// The position one step past this one, clamped at the ceiling.
    /// Used when appending a task after the current column maximum.
    pub fn after(self) -> Self {
        Self(self.0.saturating_add(POSITION_STEP).min(POSITION_CEILING))
    }

    /// Whether the value lies in the persistable range
    pub fn in_bounds(self) -> bool {
        (POSITION_STEP..=POSITION_CEILING).contains(&self.0)
    }
}
