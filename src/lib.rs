//! Snake Puzzle Generator and SAT Solver
//!
//! This library models Snake grid puzzles (a single orthogonal path between two
//! given cells, constrained by row and column counts and a no-touching rule),
//! generates random puzzles with a known witness path, and solves puzzles
//! exactly with an incremental SAT encoding.

pub mod config;
pub mod error;
pub mod generate;
pub mod sat;
pub mod snake;
pub mod utils;

pub use config::Settings;
pub use error::{GenerateError, PuzzleError, SolverError};
pub use generate::{GeneratorOptions, PathGenerator};
pub use sat::{SatEncoder, SolveOutcome, SolverInfo};
pub use snake::{Cell, LineCount, SnakePuzzle, Solution, Violation};

use std::time::Duration;

/// Main entry point for solving a Snake puzzle
pub fn solve_puzzle(puzzle: &SnakePuzzle, budget: Option<Duration>) -> Result<SolveOutcome, SolverError> {
    let mut encoder = SatEncoder::new(puzzle)?;
    encoder.solve(budget)
}
