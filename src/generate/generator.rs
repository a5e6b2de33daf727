//! Random Snake puzzle generation
//!
//! A puzzle is manufactured by growing a legal snake with a randomized
//! backtracking search, then tallying its cells per row and column. The
//! snake itself is returned as the witness solution.

use crate::error::GenerateError;
use crate::snake::{Cell, GridSize, SnakePuzzle, SnakeRules, Solution};
use log::{debug, error, info};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tuning knobs for [`PathGenerator`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorOptions {
    /// Independent growth attempts before settling for the best one
    pub max_attempts: usize,
    /// Fraction of the target length the best attempt must reach
    pub acceptance_ratio: f64,
    /// Densest fill the rules allow in practice, as a fraction of the grid
    pub max_fill_ratio: f64,
    /// Search steps allowed per attempt, per grid cell
    pub steps_per_cell: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            acceptance_ratio: 0.7,
            max_fill_ratio: 0.35,
            steps_per_cell: 64,
        }
    }
}

/// Generates Snake puzzles together with a witness path
#[derive(Debug, Clone, Default)]
pub struct PathGenerator {
    options: GeneratorOptions,
}

impl PathGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generate a puzzle and its solution on a `rows` x `cols` grid.
    ///
    /// All randomness comes from `rng`, so a seeded generator reproduces the
    /// same puzzle.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rows: usize,
        cols: usize,
        fill_percentage: f64,
        rng: &mut R,
    ) -> Result<(SnakePuzzle, Solution), GenerateError> {
        let path = self.generate_path(rows, cols, fill_percentage, rng)?;
        let size = GridSize::new(rows, cols);

        let (start, end) = match (path.first(), path.last()) {
            (Some(&start), Some(&end)) => (start, end),
            _ => {
                return Err(GenerateError::Exhausted {
                    attempts: self.options.max_attempts,
                    best: 0,
                    target: self.target_length(size, fill_percentage),
                })
            }
        };

        let solution: Solution = path.iter().copied().collect();
        let puzzle = SnakePuzzle::from_solution(size, &solution, start, end).map_err(|e| {
            error!("Generated path produced an invalid puzzle definition: {}", e);
            GenerateError::Puzzle(e)
        })?;

        if let Err(violation) = puzzle.check(&solution) {
            error!("Generated path rejected by the validator: {}", violation);
            return Err(GenerateError::Inconsistent(violation));
        }

        info!("Generated {} puzzle with a {}-cell snake", size, solution.len());
        Ok((puzzle, solution))
    }

    /// Grow an ordered snake path, start first
    pub fn generate_path<R: Rng + ?Sized>(
        &self,
        rows: usize,
        cols: usize,
        fill_percentage: f64,
        rng: &mut R,
    ) -> Result<Vec<Cell>, GenerateError> {
        if rows == 0 || cols == 0 {
            return Err(GenerateError::InvalidParameters {
                reason: format!("rows and columns must be positive (got {}x{})", rows, cols),
            });
        }
        if !(fill_percentage > 0.0 && fill_percentage <= 1.0) {
            return Err(GenerateError::InvalidParameters {
                reason: format!("fill percentage must be in (0, 1] (got {})", fill_percentage),
            });
        }

        let size = GridSize::new(rows, cols);
        let target = self.target_length(size, fill_percentage);
        let step_limit = size.area().saturating_mul(self.options.steps_per_cell).max(1);
        debug!("Growing snake on {} grid, target length {}", size, target);

        let mut best: Vec<Cell> = Vec::new();
        let mut attempts = 0;
        for attempt in 0..self.options.max_attempts {
            attempts = attempt + 1;
            let path = grow_path(size, target, step_limit, rng);
            debug!("Attempt {}: length {}", attempts, path.len());

            if path.len() > best.len() {
                best = path;
            }
            if best.len() >= target {
                break;
            }
        }

        let threshold = self.options.acceptance_ratio * target as f64;
        if best.len() >= 2 && best.len() as f64 >= threshold {
            Ok(best)
        } else {
            Err(GenerateError::Exhausted {
                attempts,
                best: best.len(),
                target,
            })
        }
    }

    /// Requested path length, capped at what the rules allow in practice
    pub fn target_length(&self, size: GridSize, fill_percentage: f64) -> usize {
        let max_len = ((size.area() as f64 * self.options.max_fill_ratio).floor() as usize).max(2);
        let wanted = (size.area() as f64 * fill_percentage).round() as usize;
        wanted.clamp(2, max_len)
    }
}

/// Legal next cells from the tail of `path`, in neighbor order
fn candidates(size: GridSize, occupied: &HashSet<Cell>, tail: Cell) -> Vec<Cell> {
    size.orthogonal_neighbors(tail)
        .filter(|&c| SnakeRules::is_legal_extension(size, c, occupied, tail))
        .collect()
}

/// One randomized depth-first growth attempt.
///
/// `alternatives[i]` holds the untried siblings of `path[i]`; on a dead end
/// the tail is popped and its siblings are retried before unwinding further.
/// Returns the longest path seen, which is the full target on success.
fn grow_path<R: Rng + ?Sized>(size: GridSize, target: usize, step_limit: usize, rng: &mut R) -> Vec<Cell> {
    let start = Cell::new(rng.gen_range(0..size.rows), rng.gen_range(0..size.cols));
    let mut path = vec![start];
    let mut occupied: HashSet<Cell> = HashSet::from([start]);
    let mut alternatives: Vec<Vec<Cell>> = vec![Vec::new()];
    let mut longest = path.clone();

    let mut steps = 0;
    while path.len() < target && steps < step_limit {
        steps += 1;
        let tail = path[path.len() - 1];
        let mut options = candidates(size, &occupied, tail);

        if !options.is_empty() {
            options.shuffle(rng);
            if let Some(next) = options.pop() {
                path.push(next);
                occupied.insert(next);
                alternatives.push(options);
            }
        } else if !backtrack(size, &mut path, &mut occupied, &mut alternatives) {
            break;
        }

        if path.len() > longest.len() {
            longest.clone_from(&path);
        }
    }

    longest
}

/// Undo cells until some position has an untried sibling that is still legal,
/// then take it. Returns false once the whole search tree is exhausted.
fn backtrack(
    size: GridSize,
    path: &mut Vec<Cell>,
    occupied: &mut HashSet<Cell>,
    alternatives: &mut Vec<Vec<Cell>>,
) -> bool {
    while path.len() > 1 {
        if let Some(removed) = path.pop() {
            occupied.remove(&removed);
        }
        let mut siblings = alternatives.pop().unwrap_or_default();
        let tail = path[path.len() - 1];

        while let Some(next) = siblings.pop() {
            if SnakeRules::is_legal_extension(size, next, &*occupied, tail) {
                path.push(next);
                occupied.insert(next);
                alternatives.push(siblings);
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let generator = PathGenerator::default();
        for (rows, cols, fill) in [(0, 5, 0.3), (5, 0, 0.3), (5, 5, 0.0), (5, 5, 1.5), (5, 5, f64::NAN)] {
            let result = generator.generate(rows, cols, fill, &mut rng(1));
            assert!(matches!(result, Err(GenerateError::InvalidParameters { .. })));
        }
    }

    #[test]
    fn test_target_length_clamped() {
        let generator = PathGenerator::default();
        assert_eq!(generator.target_length(GridSize::new(10, 10), 0.3), 30);
        // Full fill is capped at 35% of the grid
        assert_eq!(generator.target_length(GridSize::new(10, 10), 1.0), 35);
        assert_eq!(generator.target_length(GridSize::new(2, 2), 0.1), 2);
    }

    #[test]
    fn test_generated_puzzle_validates() {
        let generator = PathGenerator::default();
        let (puzzle, solution) = generator.generate(6, 6, 0.3, &mut rng(42)).unwrap();

        assert!(puzzle.validate(&solution));
        assert!(puzzle.is_fully_specified());
        assert_eq!(puzzle.implied_length(), Some(solution.len()));
    }

    #[test]
    fn test_counts_match_tally() {
        let generator = PathGenerator::default();
        let (puzzle, solution) = generator.generate(8, 7, 0.3, &mut rng(7)).unwrap();

        let rows: Vec<_> = puzzle.row_counts().iter().map(|c| c.fixed().unwrap()).collect();
        let cols: Vec<_> = puzzle.col_counts().iter().map(|c| c.fixed().unwrap()).collect();
        assert_eq!(rows, solution.row_tally(8));
        assert_eq!(cols, solution.col_tally(7));
    }

    #[test]
    fn test_same_seed_same_path() {
        let generator = PathGenerator::default();
        let first = generator.generate_path(9, 9, 0.3, &mut rng(1234)).unwrap();
        let second = generator.generate_path(9, 9, 0.3, &mut rng(1234)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_tiny_grid() {
        let generator = PathGenerator::default();
        let (puzzle, solution) = generator.generate(1, 2, 1.0, &mut rng(3)).unwrap();
        assert_eq!(solution.len(), 2);
        assert!(puzzle.validate(&solution));
    }

    #[test]
    fn test_single_cell_grid_exhausts() {
        let generator = PathGenerator::default();
        let result = generator.generate(1, 1, 1.0, &mut rng(3));
        assert!(matches!(result, Err(GenerateError::Exhausted { best: 1, target: 2, .. })));
    }

    #[test]
    fn test_path_is_ordered_snake() {
        let generator = PathGenerator::default();
        let path = generator.generate_path(7, 7, 0.3, &mut rng(99)).unwrap();
        let cells: HashSet<Cell> = path.iter().copied().collect();

        assert_eq!(cells.len(), path.len());
        for pair in path.windows(2) {
            assert!(pair[0].is_orthogonal_to(pair[1]));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_generated_paths_are_snakes(seed in any::<u64>(), rows in 2usize..9, cols in 2usize..9) {
            let generator = PathGenerator::default();
            let size = GridSize::new(rows, cols);
            let (puzzle, solution) = generator.generate(rows, cols, 0.3, &mut rng(seed)).unwrap();

            prop_assert!(puzzle.validate(&solution));

            // Degree: endpoints one neighbor, body two
            for cell in solution.iter() {
                let degree = size.orthogonal_neighbors(cell).filter(|n| solution.contains(*n)).count();
                let expected = if puzzle.is_endpoint(cell) { 1 } else { 2 };
                prop_assert_eq!(degree, expected);
            }

            // Every diagonal touch is bridged
            for (p, q, bridges) in SnakeRules::diagonal_pairs(size) {
                if solution.contains(p) && solution.contains(q) {
                    prop_assert!(bridges.iter().any(|b| solution.contains(*b)));
                }
            }
        }
    }
}
