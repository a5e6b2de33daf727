//! Solution validation for Snake puzzles

use super::rules::SnakeRules;
use super::{Cell, SnakePuzzle, Solution};
use std::collections::HashSet;
use thiserror::Error;

/// The first rule a candidate solution breaks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("cell {0} is outside the grid")]
    OutOfBounds(Cell),

    #[error("{which} cell {cell} is not on the path")]
    MissingEndpoint { which: &'static str, cell: Cell },

    #[error("cell {cell} has {degree} path neighbors, expected {expected}")]
    Degree { cell: Cell, degree: usize, expected: usize },

    #[error("path from start reaches {reached} of {total} cells")]
    Disconnected { reached: usize, total: usize },

    #[error("cell {0} touches the snake body orthogonally")]
    SelfAdjacent(Cell),

    #[error("cells {0} and {1} touch diagonally without a bridge")]
    DiagonalTouch(Cell, Cell),

    #[error("{line} {index} has {actual} cells, expected {expected}")]
    CountMismatch {
        line: &'static str,
        index: usize,
        expected: usize,
        actual: usize,
    },
}

impl SnakePuzzle {
    /// True iff `solution` is a legal snake for this puzzle
    pub fn validate(&self, solution: &Solution) -> bool {
        self.check(solution).is_ok()
    }

    /// Check `solution` and report the first broken rule
    pub fn check(&self, solution: &Solution) -> Result<(), Violation> {
        let size = self.size();

        if let Some(cell) = solution.iter().find(|c| !size.contains(*c)) {
            return Err(Violation::OutOfBounds(cell));
        }
        for (which, cell) in [("start", self.start()), ("end", self.end())] {
            if !solution.contains(cell) {
                return Err(Violation::MissingEndpoint { which, cell });
            }
        }

        for cell in solution.iter() {
            let degree = size.orthogonal_neighbors(cell).filter(|n| solution.contains(*n)).count();
            let expected = if self.is_endpoint(cell) { 1 } else { 2 };
            if degree != expected {
                return Err(Violation::Degree { cell, degree, expected });
            }
        }

        let path = self.trace_path(solution);
        if path.len() != solution.len() || path.last() != Some(&self.end()) {
            return Err(Violation::Disconnected {
                reached: path.len(),
                total: solution.len(),
            });
        }

        let mut occupied = HashSet::with_capacity(path.len());
        let mut previous = None;
        for &cell in &path {
            if SnakeRules::violates_self_adjacency(size, cell, &occupied, previous) {
                return Err(Violation::SelfAdjacent(cell));
            }
            occupied.insert(cell);
            previous = Some(cell);
        }

        for cell in solution.iter() {
            if let Some(diagonal) = SnakeRules::unbridged_diagonal(size, cell, solution) {
                return Err(Violation::DiagonalTouch(cell, diagonal));
            }
        }

        self.check_counts(solution)
    }

    /// Compare row and column tallies against the fixed counts
    pub fn check_counts(&self, solution: &Solution) -> Result<(), Violation> {
        let lines = [
            ("row", self.row_counts(), solution.row_tally(self.rows())),
            ("column", self.col_counts(), solution.col_tally(self.cols())),
        ];
        for (line, counts, tally) in lines {
            for (index, (count, &actual)) in counts.iter().zip(&tally).enumerate() {
                if let Some(expected) = count.fixed() {
                    if expected != actual {
                        return Err(Violation::CountMismatch { line, index, expected, actual });
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk the solution from the start cell, always stepping to an unvisited
    /// path neighbor. Only meaningful once degrees have been checked.
    fn trace_path(&self, solution: &Solution) -> Vec<Cell> {
        let size = self.size();
        let mut path = vec![self.start()];
        let mut visited: HashSet<Cell> = HashSet::from([self.start()]);
        let mut current = self.start();

        while current != self.end() {
            let next = size
                .orthogonal_neighbors(current)
                .find(|n| solution.contains(*n) && !visited.contains(n));
            match next {
                Some(next) => {
                    visited.insert(next);
                    path.push(next);
                    current = next;
                }
                None => break,
            }
        }

        path
    }
}
