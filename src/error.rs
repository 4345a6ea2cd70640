//! Planner error types.

use thiserror::Error;

use crate::traits::Cell;

/// Errors surfaced while planning a stage.
///
/// An over-capacity partition is not an error: the solver falls back to the
/// least-overweight assignment and flags it on the plan instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A cell the plan depends on (an item destination or the depot) is cut
    /// off from the rest of the stage. Stage data is expected to keep the
    /// depot and every destination in one connected component, so this is an
    /// input-data error, caught before any route is committed.
    #[error("cell ({}, {}) is unreachable", .cell.x, .cell.y)]
    Unreachable { cell: Cell },

    /// An item declares a fixed period outside the stage's period range.
    #[error("item {item} is pinned to invalid period {period}")]
    InvalidPeriod { item: usize, period: usize },
}
