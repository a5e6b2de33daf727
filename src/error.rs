//! Error types shared by the puzzle model, the generator and the solver

use crate::snake::{Cell, Violation};
use thiserror::Error;

/// Rejected puzzle definitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("{which} cell {cell} is outside the {rows}x{cols} grid")]
    CellOutOfBounds {
        which: &'static str,
        cell: Cell,
        rows: usize,
        cols: usize,
    },

    #[error("start and end must be distinct cells (both are {cell})")]
    SameEndpoints { cell: Cell },

    #[error("{line} {index} count {count} exceeds line length {length}")]
    CountOutOfRange {
        line: &'static str,
        index: usize,
        count: usize,
        length: usize,
    },

    #[error("row counts total {row_total} but column counts total {col_total}")]
    TotalMismatch { row_total: usize, col_total: usize },
}

/// Failures of the random path generator
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid generator parameters: {reason}")]
    InvalidParameters { reason: String },

    #[error("no acceptable path after {attempts} attempts (best length {best}, target {target})")]
    Exhausted {
        attempts: usize,
        best: usize,
        target: usize,
    },

    /// The move filters accepted a path the validator rejects. Always a bug.
    #[error("generated path failed validation: {0}")]
    Inconsistent(Violation),

    /// Counts tallied from a generated path were rejected. Always a bug.
    #[error("derived puzzle was rejected")]
    Puzzle(#[source] PuzzleError),
}

/// Internal failures of the constraint solver.
///
/// Infeasible puzzles and exhausted budgets are not errors, see
/// [`SolveOutcome`](crate::sat::SolveOutcome).
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("cannot add an empty clause to the solver")]
    EmptyClause,

    #[error("variable space exhausted after {count} variables")]
    VariableOverflow { count: usize },

    #[error("variable {0:?} is outside the grid")]
    UnknownVariable(crate::sat::VariableType),

    #[error("solver produced an assignment that is not a valid snake: {0}")]
    InvalidModel(Violation),
}
