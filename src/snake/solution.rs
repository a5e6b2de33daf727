//! Solution representation: the set of cells on the snake

use super::rules::Occupancy;
use super::Cell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An unordered set of path cells.
///
/// Ordering is not needed to decide validity, so a solution is just the set of
/// cells the snake occupies. Iteration is row-major.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solution {
    cells: BTreeSet<Cell>,
}

impl Solution {
    pub fn new(cells: BTreeSet<Cell>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    /// Number of path cells in each of `rows` rows
    pub fn row_tally(&self, rows: usize) -> Vec<usize> {
        let mut tally = vec![0; rows];
        for cell in self.iter().filter(|c| c.row < rows) {
            tally[cell.row] += 1;
        }
        tally
    }

    /// Number of path cells in each of `cols` columns
    pub fn col_tally(&self, cols: usize) -> Vec<usize> {
        let mut tally = vec![0; cols];
        for cell in self.iter().filter(|c| c.col < cols) {
            tally[cell.col] += 1;
        }
        tally
    }
}

impl Occupancy for Solution {
    fn is_occupied(&self, cell: Cell) -> bool {
        self.contains(cell)
    }
}

impl FromIterator<Cell> for Solution {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self { cells: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a Solution {
    type Item = &'a Cell;
    type IntoIter = std::collections::btree_set::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tallies() {
        let solution: Solution = [(0, 0), (0, 1), (1, 1), (2, 1), (2, 2)]
            .into_iter()
            .map(Cell::from)
            .collect();

        assert_eq!(solution.len(), 5);
        assert_eq!(solution.row_tally(3), vec![2, 1, 2]);
        assert_eq!(solution.col_tally(3), vec![1, 3, 1]);
    }

    #[test]
    fn test_json_is_list_of_pairs() {
        let solution: Solution = [Cell::new(1, 0), Cell::new(0, 0)].into_iter().collect();
        let json = serde_json::to_string(&solution).unwrap();
        assert_eq!(json, "[[0,0],[1,0]]");
    }
}
