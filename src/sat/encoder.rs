//! SAT encoder for Snake puzzles
//!
//! The static constraints (endpoints, line counts, diagonal bridges, degrees)
//! are encoded once. Connectivity is enforced lazily: every model is split
//! into connected components, each piece detached from the start is cut off
//! with a new clause, and the solver is re-run incrementally.

use super::constraints::ConstraintStatistics;
use super::solver::{SolveStatus, SolverResultType, SOLVER_NAME};
use super::variables::VariableStatistics;
use super::{ConstraintGenerator, SatSolver, SolverSolution};
use crate::error::SolverError;
use crate::snake::{Cell, SnakePuzzle, Solution};
use log::{debug, info, warn};
use petgraph::algo::kosaraju_scc;
use petgraph::graphmap::UnGraphMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// Tuning knobs for [`SatEncoder`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderOptions {
    /// Rounds of connectivity cuts before giving up with `Unknown`
    pub max_cut_rounds: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self { max_cut_rounds: 10_000 }
    }
}

/// Result of solving a puzzle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// A snake satisfying every rule, already validated
    Solved(Solution),
    /// The puzzle has no solution
    NoSolution,
    /// The time budget or the cut round limit ran out
    Unknown,
}

impl SolveOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved(_))
    }
}

impl std::fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveOutcome::Solved(solution) => write!(f, "solved ({} cells)", solution.len()),
            SolveOutcome::NoSolution => f.write_str("no solution"),
            SolveOutcome::Unknown => f.write_str("unknown"),
        }
    }
}

/// Diagnostics about the encoding and the last solve
#[derive(Debug, Clone)]
pub struct SolverInfo {
    pub solver: &'static str,
    pub variables: usize,
    pub clauses: usize,
    pub cuts: usize,
    /// `None` until `solve` has run
    pub status: Option<SolverResultType>,
    pub solve_time: Duration,
}

impl std::fmt::Display for SolverInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solver Info:")?;
        writeln!(f, "  Solver: {}", self.solver)?;
        writeln!(f, "  Variables: {}", self.variables)?;
        writeln!(f, "  Clauses: {}", self.clauses)?;
        writeln!(f, "  Connectivity cuts: {}", self.cuts)?;
        match self.status {
            Some(status) => writeln!(f, "  Status: {}", status)?,
            None => writeln!(f, "  Status: not solved")?,
        }
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        Ok(())
    }
}

/// Variable and clause counts broken down by family
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub variables: VariableStatistics,
    pub constraints: ConstraintStatistics,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.variables)?;
        write!(f, "{}", self.constraints)?;
        writeln!(f, "  Total clauses: {}", self.constraints.total())?;
        Ok(())
    }
}

/// Main SAT encoder for Snake puzzles
pub struct SatEncoder {
    puzzle: SnakePuzzle,
    options: EncoderOptions,
    constraint_generator: ConstraintGenerator,
    solver: SatSolver,
    cuts: usize,
    status: Option<SolverResultType>,
    solve_time: Duration,
}

impl SatEncoder {
    /// Encode the static constraints of `puzzle`
    pub fn new(puzzle: &SnakePuzzle) -> Result<Self, SolverError> {
        Self::with_options(puzzle, EncoderOptions::default())
    }

    pub fn with_options(puzzle: &SnakePuzzle, options: EncoderOptions) -> Result<Self, SolverError> {
        let mut constraint_generator = ConstraintGenerator::new(puzzle.size());
        let clauses = constraint_generator.generate_all_constraints(puzzle)?;

        let mut solver = SatSolver::new();
        solver.add_clauses(&clauses)?;

        debug!(
            "Encoded {} puzzle: {} variables, {} clauses",
            puzzle.size(),
            constraint_generator.variables().variable_count(),
            clauses.len()
        );

        Ok(Self {
            puzzle: puzzle.clone(),
            options,
            constraint_generator,
            solver,
            cuts: 0,
            status: None,
            solve_time: Duration::ZERO,
        })
    }

    /// Solve the puzzle within an optional wall-clock budget
    pub fn solve(&mut self, budget: Option<Duration>) -> Result<SolveOutcome, SolverError> {
        let started = Instant::now();
        let result = self.solve_with_cuts(started, budget);
        self.solve_time = started.elapsed();

        // A failed call leaves no status behind
        self.status = None;
        let outcome = result?;
        self.status = Some(match outcome {
            SolveOutcome::Solved(_) => SolverResultType::Satisfiable,
            SolveOutcome::NoSolution => SolverResultType::Unsatisfiable,
            SolveOutcome::Unknown => SolverResultType::Timeout,
        });
        info!(
            "Solved {} puzzle: {} after {} cuts in {:.3}s",
            self.puzzle.size(),
            outcome,
            self.cuts,
            self.solve_time.as_secs_f64()
        );
        Ok(outcome)
    }

    fn solve_with_cuts(&mut self, started: Instant, budget: Option<Duration>) -> Result<SolveOutcome, SolverError> {
        let mut rounds = 0;

        loop {
            let remaining = match budget {
                Some(limit) => match limit.checked_sub(started.elapsed()) {
                    Some(left) if !left.is_zero() => Some(left),
                    _ => return Ok(SolveOutcome::Unknown),
                },
                None => None,
            };

            let model = match self.solver.solve(remaining) {
                SolveStatus::Satisfiable(model) => model,
                SolveStatus::Unsatisfiable => return Ok(SolveOutcome::NoSolution),
                SolveStatus::Timeout => return Ok(SolveOutcome::Unknown),
            };

            let solution = self.extract_solution(&model);
            let detached = self.detached_components(&solution);
            if detached.is_empty() {
                return match self.puzzle.check(&solution) {
                    Ok(()) => Ok(SolveOutcome::Solved(solution)),
                    Err(violation) => {
                        warn!("Model failed validation: {}", violation);
                        Err(SolverError::InvalidModel(violation))
                    }
                };
            }

            if rounds >= self.options.max_cut_rounds {
                warn!("Giving up after {} cut rounds", rounds);
                return Ok(SolveOutcome::Unknown);
            }
            rounds += 1;

            debug!("Cut round {}: {} detached components", rounds, detached.len());
            for component in &detached {
                let cut = self.constraint_generator.component_cut(component)?;
                self.solver.add_clause(&cut)?;
                self.cuts += 1;
            }
        }
    }

    /// Cells whose variable is true in the model
    fn extract_solution(&self, model: &SolverSolution) -> Solution {
        let variables = self.constraint_generator.variables();
        self.puzzle
            .size()
            .cells()
            .filter(|&cell| {
                variables
                    .existing_cell_variable(cell)
                    .is_some_and(|var| model.value(var))
            })
            .collect()
    }

    /// Connected pieces of the selection that do not contain the start
    fn detached_components(&self, solution: &Solution) -> Vec<BTreeSet<Cell>> {
        let size = self.puzzle.size();
        let mut graph: UnGraphMap<Cell, ()> = UnGraphMap::new();

        for cell in solution.iter() {
            graph.add_node(cell);
            for neighbor in size.orthogonal_neighbors(cell) {
                if solution.contains(neighbor) {
                    graph.add_edge(cell, neighbor, ());
                }
            }
        }

        kosaraju_scc(&graph)
            .into_iter()
            .map(|component| component.into_iter().collect::<BTreeSet<Cell>>())
            .filter(|component| !component.contains(&self.puzzle.start()))
            .collect()
    }

    /// Encoding size and the status of the last solve
    pub fn info(&self) -> SolverInfo {
        SolverInfo {
            solver: SOLVER_NAME,
            variables: self.solver.variable_count(),
            clauses: self.solver.clause_count(),
            cuts: self.cuts,
            status: self.status,
            solve_time: self.solve_time,
        }
    }

    /// Per-family breakdown of the encoding, cuts included
    pub fn encoding_statistics(&self) -> EncodingStatistics {
        EncodingStatistics {
            variables: self.constraint_generator.variables().statistics(),
            constraints: self.constraint_generator.statistics().clone(),
        }
    }

    pub fn puzzle(&self) -> &SnakePuzzle {
        &self.puzzle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::PathGenerator;
    use crate::snake::{example_puzzle, LineCount};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn solve(puzzle: &SnakePuzzle) -> SolveOutcome {
        SatEncoder::new(puzzle).unwrap().solve(None).unwrap()
    }

    #[test]
    fn test_three_by_three() {
        let puzzle = SnakePuzzle::with_counts(&[2, 1, 2], &[1, 3, 1], (0, 0), (2, 2)).unwrap();

        match solve(&puzzle) {
            SolveOutcome::Solved(solution) => {
                assert_eq!(solution.len(), 5);
                assert!(puzzle.validate(&solution));
            }
            other => panic!("expected a solution, got {:?}", other),
        }
    }

    #[test]
    fn test_diagonal_touching_has_no_solution() {
        let puzzle = example_puzzle("diagonal_touching").unwrap();
        assert_eq!(solve(&puzzle), SolveOutcome::NoSolution);
    }

    #[test]
    fn test_adjacent_touching_has_no_solution() {
        let puzzle = example_puzzle("adjacent_touching").unwrap();
        assert_eq!(solve(&puzzle), SolveOutcome::NoSolution);
    }

    #[test]
    fn test_six_by_six_example() {
        let puzzle = example_puzzle("6x6_easy").unwrap();
        let outcome = solve(&puzzle);
        let solution = outcome.solution().expect("6x6 example is solvable");
        assert!(puzzle.validate(solution));
        assert_eq!(Some(solution.len()), puzzle.implied_length());
    }

    #[test]
    fn test_partially_unconstrained() {
        let puzzle = SnakePuzzle::new(
            vec![LineCount::Fixed(2), LineCount::Unconstrained, LineCount::Fixed(2)],
            vec![LineCount::Fixed(1), LineCount::Unconstrained, LineCount::Fixed(1)],
            Cell::new(0, 0),
            Cell::new(2, 2),
        )
        .unwrap();

        let outcome = solve(&puzzle);
        assert!(puzzle.validate(outcome.solution().expect("solvable")));
    }

    #[test]
    fn test_generated_puzzles_solve_back() {
        let generator = PathGenerator::default();
        for seed in 0..5 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (puzzle, _) = generator.generate(7, 7, 0.3, &mut rng).unwrap();

            // The solver may find a different snake with the same counts
            let outcome = solve(&puzzle);
            assert!(puzzle.validate(outcome.solution().expect("generated puzzle is solvable")));
        }
    }

    #[test]
    fn test_info_tracks_solve() {
        let puzzle = example_puzzle("3x3").unwrap();
        let mut encoder = SatEncoder::new(&puzzle).unwrap();

        let before = encoder.info();
        assert_eq!(before.solver, "CaDiCaL");
        assert!(before.variables >= 9);
        assert!(before.clauses > 0);
        assert!(before.status.is_none());

        encoder.solve(None).unwrap();
        let after = encoder.info();
        assert_eq!(after.status, Some(SolverResultType::Satisfiable));
        assert!(after.clauses >= before.clauses);
        assert_eq!(after.clauses - before.clauses, after.cuts);
    }

    #[test]
    fn test_evil_example_solves() {
        let puzzle = example_puzzle("12x12_evil").unwrap();
        match solve(&puzzle) {
            SolveOutcome::Solved(solution) => assert!(puzzle.validate(&solution)),
            other => panic!("expected a solution, got {:?}", other),
        }
    }

    #[test]
    fn test_cut_round_limit_is_unknown() {
        // Open lines leave plenty of room for detached loops
        let puzzle = SnakePuzzle::new(
            vec![LineCount::Unconstrained; 8],
            vec![LineCount::Unconstrained; 8],
            Cell::new(0, 0),
            Cell::new(7, 7),
        )
        .unwrap();
        let mut encoder = SatEncoder::with_options(&puzzle, EncoderOptions { max_cut_rounds: 1 }).unwrap();

        assert_eq!(encoder.solve(None).unwrap(), SolveOutcome::Unknown);
        assert_eq!(encoder.info().status, Some(SolverResultType::Timeout));
    }

    #[test]
    fn test_zero_cut_rounds_gives_up_on_detached_model() {
        let puzzle = example_puzzle("12x12_evil").unwrap();
        let mut encoder = SatEncoder::with_options(&puzzle, EncoderOptions { max_cut_rounds: 0 }).unwrap();

        // Any connected first model is still a valid answer
        match encoder.solve(None).unwrap() {
            SolveOutcome::Solved(solution) => assert!(puzzle.validate(&solution)),
            SolveOutcome::Unknown => assert_eq!(encoder.info().cuts, 0),
            SolveOutcome::NoSolution => panic!("12x12 example is solvable"),
        }
    }

    #[test]
    fn test_encoding_statistics() {
        let puzzle = example_puzzle("3x3").unwrap();
        let mut encoder = SatEncoder::new(&puzzle).unwrap();
        let before = encoder.encoding_statistics();

        assert_eq!(before.variables.cell_variables, 9);
        assert_eq!(before.constraints.endpoint_clauses, 2);
        // Two diagonal pairs in each of the four 2x2 blocks
        assert_eq!(before.constraints.bridge_clauses, 8);
        assert_eq!(before.constraints.total(), encoder.info().clauses);

        encoder.solve(None).unwrap();
        let after = encoder.encoding_statistics();
        assert_eq!(after.constraints.cut_clauses, encoder.info().cuts);
        assert_eq!(after.constraints.total(), encoder.info().clauses);
        assert!(after.to_string().contains("Bridge clauses: 8"));
    }

    #[test]
    fn test_failed_solve_clears_status() {
        let puzzle = example_puzzle("3x3").unwrap();
        let mut encoder = SatEncoder::new(&puzzle).unwrap();
        encoder.solve(None).unwrap();
        assert_eq!(encoder.info().status, Some(SolverResultType::Satisfiable));

        // Models of the encoded counts cannot satisfy the transposed ones
        encoder.puzzle = SnakePuzzle::with_counts(&[1, 3, 1], &[2, 1, 2], (0, 0), (2, 2)).unwrap();
        assert!(matches!(encoder.solve(None), Err(SolverError::InvalidModel(_))));
        assert!(encoder.info().status.is_none());
    }

    #[test]
    fn test_exhausted_budget_is_unknown() {
        let puzzle = example_puzzle("6x6_easy").unwrap();
        let mut encoder = SatEncoder::new(&puzzle).unwrap();
        assert_eq!(encoder.solve(Some(Duration::ZERO)).unwrap(), SolveOutcome::Unknown);
        assert_eq!(encoder.info().status, Some(SolverResultType::Timeout));
    }

    #[test]
    fn test_small_budget_never_misreports() {
        let puzzle = example_puzzle("12x12_evil").unwrap();
        let mut encoder = SatEncoder::new(&puzzle).unwrap();
        match encoder.solve(Some(Duration::from_millis(50))).unwrap() {
            SolveOutcome::Solved(solution) => assert!(puzzle.validate(&solution)),
            SolveOutcome::Unknown => {}
            SolveOutcome::NoSolution => panic!("12x12 example is solvable"),
        }
    }

    #[test]
    fn test_detached_components() {
        let puzzle = example_puzzle("6x6_easy").unwrap();
        let encoder = SatEncoder::new(&puzzle).unwrap();

        let selection: Solution = [(0, 0), (1, 0), (3, 3), (3, 4), (5, 5)]
            .into_iter()
            .map(|(r, c)| Cell::new(r, c))
            .collect();
        let detached = encoder.detached_components(&selection);
        assert_eq!(detached.len(), 2);
        assert!(detached.iter().all(|c| !c.contains(&puzzle.start())));
    }
}
