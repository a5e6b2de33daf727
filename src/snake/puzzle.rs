//! Snake puzzle definition

use super::{Cell, GridSize, Solution};
use crate::error::PuzzleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target count for a single row or column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<usize>", into = "Option<usize>")]
pub enum LineCount {
    Fixed(usize),
    Unconstrained,
}

impl LineCount {
    /// The required count, if any
    pub fn fixed(self) -> Option<usize> {
        match self {
            LineCount::Fixed(n) => Some(n),
            LineCount::Unconstrained => None,
        }
    }

    /// True if `actual` satisfies this count
    pub fn accepts(self, actual: usize) -> bool {
        match self {
            LineCount::Fixed(n) => n == actual,
            LineCount::Unconstrained => true,
        }
    }
}

impl From<Option<usize>> for LineCount {
    fn from(value: Option<usize>) -> Self {
        value.map_or(LineCount::Unconstrained, LineCount::Fixed)
    }
}

impl From<LineCount> for Option<usize> {
    fn from(count: LineCount) -> Self {
        count.fixed()
    }
}

impl From<usize> for LineCount {
    fn from(n: usize) -> Self {
        LineCount::Fixed(n)
    }
}

impl fmt::Display for LineCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineCount::Fixed(n) => write!(f, "{}", n),
            LineCount::Unconstrained => write!(f, "?"),
        }
    }
}

/// On-disk shape of a puzzle, checked by [`SnakePuzzle::new`] on load
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PuzzleDefinition {
    row_counts: Vec<LineCount>,
    col_counts: Vec<LineCount>,
    start: Cell,
    end: Cell,
}

/// An immutable Snake puzzle: line counts plus fixed endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PuzzleDefinition", into = "PuzzleDefinition")]
pub struct SnakePuzzle {
    size: GridSize,
    row_counts: Vec<LineCount>,
    col_counts: Vec<LineCount>,
    start: Cell,
    end: Cell,
}

impl SnakePuzzle {
    /// Build a puzzle, rejecting definitions no snake could satisfy structurally
    pub fn new(
        row_counts: Vec<LineCount>,
        col_counts: Vec<LineCount>,
        start: Cell,
        end: Cell,
    ) -> Result<Self, PuzzleError> {
        let size = GridSize::new(row_counts.len(), col_counts.len());
        if size.rows == 0 || size.cols == 0 {
            return Err(PuzzleError::EmptyGrid { rows: size.rows, cols: size.cols });
        }

        for (which, cell) in [("start", start), ("end", end)] {
            if !size.contains(cell) {
                return Err(PuzzleError::CellOutOfBounds {
                    which,
                    cell,
                    rows: size.rows,
                    cols: size.cols,
                });
            }
        }
        if start == end {
            return Err(PuzzleError::SameEndpoints { cell: start });
        }

        check_line_counts("row", &row_counts, size.cols)?;
        check_line_counts("column", &col_counts, size.rows)?;

        let row_total: Option<usize> = row_counts.iter().map(|c| c.fixed()).sum();
        let col_total: Option<usize> = col_counts.iter().map(|c| c.fixed()).sum();
        if let (Some(row_total), Some(col_total)) = (row_total, col_total) {
            if row_total != col_total {
                return Err(PuzzleError::TotalMismatch { row_total, col_total });
            }
        }

        Ok(Self {
            size,
            row_counts,
            col_counts,
            start,
            end,
        })
    }

    /// Build a fully specified puzzle from plain counts
    pub fn with_counts(
        row_counts: &[usize],
        col_counts: &[usize],
        start: impl Into<Cell>,
        end: impl Into<Cell>,
    ) -> Result<Self, PuzzleError> {
        Self::new(
            row_counts.iter().copied().map(LineCount::Fixed).collect(),
            col_counts.iter().copied().map(LineCount::Fixed).collect(),
            start.into(),
            end.into(),
        )
    }

    /// Derive the puzzle whose unique witness (as far as counts go) is `solution`
    pub fn from_solution(
        size: GridSize,
        solution: &Solution,
        start: Cell,
        end: Cell,
    ) -> Result<Self, PuzzleError> {
        Self::with_counts(
            &solution.row_tally(size.rows),
            &solution.col_tally(size.cols),
            start,
            end,
        )
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn rows(&self) -> usize {
        self.size.rows
    }

    pub fn cols(&self) -> usize {
        self.size.cols
    }

    pub fn row_counts(&self) -> &[LineCount] {
        &self.row_counts
    }

    pub fn col_counts(&self) -> &[LineCount] {
        &self.col_counts
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn end(&self) -> Cell {
        self.end
    }

    /// True if `cell` is the start or the end
    pub fn is_endpoint(&self, cell: Cell) -> bool {
        cell == self.start || cell == self.end
    }

    /// Path length implied by the counts, when every row or every column is fixed
    pub fn implied_length(&self) -> Option<usize> {
        let rows: Option<usize> = self.row_counts.iter().map(|c| c.fixed()).sum();
        rows.or_else(|| self.col_counts.iter().map(|c| c.fixed()).sum())
    }

    /// True if every row and column count is fixed
    pub fn is_fully_specified(&self) -> bool {
        self.row_counts.iter().chain(&self.col_counts).all(|c| c.fixed().is_some())
    }
}

fn check_line_counts(line: &'static str, counts: &[LineCount], length: usize) -> Result<(), PuzzleError> {
    for (index, count) in counts.iter().enumerate() {
        if let LineCount::Fixed(count) = *count {
            if count > length {
                return Err(PuzzleError::CountOutOfRange { line, index, count, length });
            }
        }
    }
    Ok(())
}

impl TryFrom<PuzzleDefinition> for SnakePuzzle {
    type Error = PuzzleError;

    fn try_from(def: PuzzleDefinition) -> Result<Self, Self::Error> {
        SnakePuzzle::new(def.row_counts, def.col_counts, def.start, def.end)
    }
}

impl From<SnakePuzzle> for PuzzleDefinition {
    fn from(puzzle: SnakePuzzle) -> Self {
        PuzzleDefinition {
            row_counts: puzzle.row_counts,
            col_counts: puzzle.col_counts,
            start: puzzle.start,
            end: puzzle.end,
        }
    }
}

impl fmt::Display for SnakePuzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |counts: &[LineCount]| {
            counts.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(",")
        };
        write!(
            f,
            "SnakePuzzle({}, rows=[{}], cols=[{}], start={}, end={})",
            self.size,
            join(&self.row_counts),
            join(&self.col_counts),
            self.start,
            self.end
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_puzzle_creation() {
        let puzzle = SnakePuzzle::with_counts(&[2, 1, 2], &[1, 3, 1], (0, 0), (2, 2)).unwrap();
        assert_eq!(puzzle.rows(), 3);
        assert_eq!(puzzle.cols(), 3);
        assert_eq!(puzzle.start(), Cell::new(0, 0));
        assert_eq!(puzzle.end(), Cell::new(2, 2));
        assert_eq!(puzzle.implied_length(), Some(5));
        assert!(puzzle.is_fully_specified());
    }

    #[test]
    fn test_empty_grid_rejected() {
        let err = SnakePuzzle::new(vec![], vec![LineCount::Fixed(1)], Cell::new(0, 0), Cell::new(0, 1));
        assert!(matches!(err, Err(PuzzleError::EmptyGrid { .. })));
    }

    #[test]
    fn test_out_of_bounds_endpoint_rejected() {
        let err = SnakePuzzle::with_counts(&[1, 1], &[1, 1], (0, 0), (2, 0));
        assert!(matches!(err, Err(PuzzleError::CellOutOfBounds { which: "end", .. })));
    }

    #[test]
    fn test_same_endpoints_rejected() {
        let err = SnakePuzzle::with_counts(&[1, 1], &[1, 1], (1, 1), (1, 1));
        assert!(matches!(err, Err(PuzzleError::SameEndpoints { .. })));
    }

    #[test]
    fn test_count_over_line_length_rejected() {
        let err = SnakePuzzle::with_counts(&[4, 0], &[1, 1, 1], (0, 0), (0, 2));
        assert_eq!(
            err,
            Err(PuzzleError::CountOutOfRange { line: "row", index: 0, count: 4, length: 3 })
        );
    }

    #[test]
    fn test_total_mismatch_rejected() {
        let err = SnakePuzzle::with_counts(&[2, 1], &[1, 1], (0, 0), (1, 1));
        assert_eq!(err, Err(PuzzleError::TotalMismatch { row_total: 3, col_total: 2 }));
    }

    #[test]
    fn test_partial_counts_skip_total_check() {
        let puzzle = SnakePuzzle::new(
            vec![LineCount::Fixed(3), LineCount::Unconstrained],
            vec![LineCount::Fixed(1), LineCount::Fixed(1), LineCount::Fixed(1)],
            Cell::new(0, 0),
            Cell::new(0, 2),
        )
        .unwrap();
        assert!(!puzzle.is_fully_specified());
        assert_eq!(puzzle.implied_length(), Some(3));
    }

    #[test]
    fn test_yaml_load_goes_through_validation() {
        let yaml = "row_counts: [2, 1, 2]\ncol_counts: [1, 3, ~]\nstart: [0, 0]\nend: [2, 2]\n";
        let puzzle: SnakePuzzle = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(puzzle.col_counts()[2], LineCount::Unconstrained);

        let bad = "row_counts: [2, 1, 2]\ncol_counts: [1, 3, 1]\nstart: [0, 0]\nend: [0, 0]\n";
        assert!(serde_yaml::from_str::<SnakePuzzle>(bad).is_err());
    }
}
