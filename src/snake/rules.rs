//! Snake path rules: self-adjacency and diagonal bridging
//!
//! These predicates are the only definition of a legal snake body. The
//! generator uses them to filter moves, the validator to check solutions and
//! the SAT encoder derives its bridging clauses from [`SnakeRules::bridge_cells`].

use super::{Cell, GridSize};
use std::collections::{BTreeSet, HashSet};

/// Anything that can answer "is this cell part of the path?"
pub trait Occupancy {
    fn is_occupied(&self, cell: Cell) -> bool;
}

impl Occupancy for HashSet<Cell> {
    fn is_occupied(&self, cell: Cell) -> bool {
        self.contains(&cell)
    }
}

impl Occupancy for BTreeSet<Cell> {
    fn is_occupied(&self, cell: Cell) -> bool {
        self.contains(&cell)
    }
}

/// Snake rules engine
pub struct SnakeRules;

impl SnakeRules {
    /// True if `candidate` would touch an occupied cell other than `allowed_neighbor`
    pub fn violates_self_adjacency<O: Occupancy + ?Sized>(
        size: GridSize,
        candidate: Cell,
        occupied: &O,
        allowed_neighbor: Option<Cell>,
    ) -> bool {
        size.orthogonal_neighbors(candidate)
            .any(|n| Some(n) != allowed_neighbor && occupied.is_occupied(n))
    }

    /// The two cells orthogonally adjacent to both diagonal neighbors `p` and `q`
    pub fn bridge_cells(p: Cell, q: Cell) -> Option<[Cell; 2]> {
        if !p.is_diagonal_to(q) {
            return None;
        }
        Some([Cell::new(p.row, q.col), Cell::new(q.row, p.col)])
    }

    /// The first occupied diagonal neighbor of `candidate` with no occupied bridge
    pub fn unbridged_diagonal<O: Occupancy + ?Sized>(
        size: GridSize,
        candidate: Cell,
        occupied: &O,
    ) -> Option<Cell> {
        size.diagonal_neighbors(candidate)
            .filter(|d| occupied.is_occupied(*d))
            .find(|d| match Self::bridge_cells(candidate, *d) {
                Some(bridges) => !bridges.iter().any(|b| occupied.is_occupied(*b)),
                None => false,
            })
    }

    /// True if `candidate` touches an occupied cell only through a corner
    pub fn violates_diagonal_touching<O: Occupancy + ?Sized>(
        size: GridSize,
        candidate: Cell,
        occupied: &O,
    ) -> bool {
        Self::unbridged_diagonal(size, candidate, occupied).is_some()
    }

    /// Combined move filter used while growing a path from `tail`
    pub fn is_legal_extension<O: Occupancy + ?Sized>(
        size: GridSize,
        candidate: Cell,
        occupied: &O,
        tail: Cell,
    ) -> bool {
        size.contains(candidate)
            && !occupied.is_occupied(candidate)
            && !Self::violates_self_adjacency(size, candidate, occupied, Some(tail))
            && !Self::violates_diagonal_touching(size, candidate, occupied)
    }

    /// Every unordered diagonal pair of the grid, each with its bridge cells
    pub fn diagonal_pairs(size: GridSize) -> Vec<(Cell, Cell, [Cell; 2])> {
        let mut pairs = Vec::new();
        for cell in size.cells() {
            // Only look down-left and down-right so each pair appears once
            for dc in [-1isize, 1] {
                if let Some(other) = cell.offset(1, dc).filter(|c| size.contains(*c)) {
                    if let Some(bridges) = Self::bridge_cells(cell, other) {
                        pairs.push((cell, other, bridges));
                    }
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupied(cells: &[(usize, usize)]) -> HashSet<Cell> {
        cells.iter().map(|&c| Cell::from(c)).collect()
    }

    #[test]
    fn test_bridge_cells() {
        let bridges = SnakeRules::bridge_cells(Cell::new(0, 0), Cell::new(1, 1)).unwrap();
        assert_eq!(bridges, [Cell::new(0, 1), Cell::new(1, 0)]);
        assert!(SnakeRules::bridge_cells(Cell::new(0, 0), Cell::new(0, 1)).is_none());
    }

    #[test]
    fn test_self_adjacency_allows_tail() {
        let size = GridSize::new(3, 3);
        let path = occupied(&[(0, 0), (0, 1)]);
        assert!(!SnakeRules::violates_self_adjacency(size, Cell::new(0, 2), &path, Some(Cell::new(0, 1))));
        // (1,0) touches (0,0), which is not the tail
        assert!(SnakeRules::violates_self_adjacency(size, Cell::new(1, 0), &path, Some(Cell::new(0, 1))));
    }

    #[test]
    fn test_unbridged_diagonal_is_illegal() {
        let size = GridSize::new(3, 3);
        let path = occupied(&[(0, 0)]);
        assert!(SnakeRules::violates_diagonal_touching(size, Cell::new(1, 1), &path));
    }

    #[test]
    fn test_bridged_diagonal_is_legal() {
        let size = GridSize::new(3, 3);
        let path = occupied(&[(0, 0), (0, 1)]);
        assert!(!SnakeRules::violates_diagonal_touching(size, Cell::new(1, 1), &path));
    }

    #[test]
    fn test_legal_extension() {
        let size = GridSize::new(3, 3);
        let path = occupied(&[(0, 0), (0, 1)]);
        let tail = Cell::new(0, 1);
        assert!(SnakeRules::is_legal_extension(size, Cell::new(1, 1), &path, tail));
        assert!(SnakeRules::is_legal_extension(size, Cell::new(0, 2), &path, tail));
        assert!(!SnakeRules::is_legal_extension(size, Cell::new(0, 0), &path, tail));
        assert!(!SnakeRules::is_legal_extension(size, Cell::new(0, 3), &path, tail));
    }

    #[test]
    fn test_diagonal_pairs_counted_once() {
        // (rows-1) * (cols-1) squares, two diagonals each
        let pairs = SnakeRules::diagonal_pairs(GridSize::new(3, 4));
        assert_eq!(pairs.len(), 2 * 2 * 3);
    }
}
