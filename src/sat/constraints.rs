//! Constraint generation for the Snake SAT encoding

use super::VariableManager;
use crate::error::SolverError;
use crate::snake::{Cell, GridSize, LineCount, SnakePuzzle, SnakeRules};
use itertools::Itertools;
use std::collections::BTreeSet;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self { literals: vec![literal] }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}

/// Clause counts per constraint family
#[derive(Debug, Clone, Default)]
pub struct ConstraintStatistics {
    pub endpoint_clauses: usize,
    pub count_clauses: usize,
    pub bridge_clauses: usize,
    pub degree_clauses: usize,
    pub cut_clauses: usize,
}

impl ConstraintStatistics {
    pub fn total(&self) -> usize {
        self.endpoint_clauses + self.count_clauses + self.bridge_clauses + self.degree_clauses + self.cut_clauses
    }
}

impl std::fmt::Display for ConstraintStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Constraint Statistics:")?;
        writeln!(f, "  Endpoint clauses: {}", self.endpoint_clauses)?;
        writeln!(f, "  Line count clauses: {}", self.count_clauses)?;
        writeln!(f, "  Bridge clauses: {}", self.bridge_clauses)?;
        writeln!(f, "  Degree clauses: {}", self.degree_clauses)?;
        writeln!(f, "  Connectivity cuts: {}", self.cut_clauses)?;
        Ok(())
    }
}

/// Generates SAT constraints for a Snake puzzle
pub struct ConstraintGenerator {
    variable_manager: VariableManager,
    size: GridSize,
    statistics: ConstraintStatistics,
}

impl ConstraintGenerator {
    pub fn new(size: GridSize) -> Self {
        Self {
            variable_manager: VariableManager::new(size),
            size,
            statistics: ConstraintStatistics::default(),
        }
    }

    /// Generate every static constraint of the puzzle.
    ///
    /// Connectivity is not part of this set; it is enforced lazily with
    /// [`component_cut`](Self::component_cut).
    pub fn generate_all_constraints(&mut self, puzzle: &SnakePuzzle) -> Result<Vec<Clause>, SolverError> {
        // Allocate cell variables first so they are 1..=area in row-major order
        self.variable_manager.all_cell_variables()?;

        let mut clauses = Vec::new();

        let endpoint = self.generate_endpoint_constraints(puzzle)?;
        self.statistics.endpoint_clauses += endpoint.len();
        clauses.extend(endpoint);

        let counts = self.generate_count_constraints(puzzle)?;
        self.statistics.count_clauses += counts.len();
        clauses.extend(counts);

        let bridges = self.generate_bridge_constraints()?;
        self.statistics.bridge_clauses += bridges.len();
        clauses.extend(bridges);

        let degree = self.generate_degree_constraints(puzzle)?;
        self.statistics.degree_clauses += degree.len();
        clauses.extend(degree);

        Ok(clauses)
    }

    /// Start and end are always on the snake
    fn generate_endpoint_constraints(&mut self, puzzle: &SnakePuzzle) -> Result<Vec<Clause>, SolverError> {
        Ok(vec![
            Clause::unit(self.variable_manager.cell_variable(puzzle.start())?),
            Clause::unit(self.variable_manager.cell_variable(puzzle.end())?),
        ])
    }

    /// Exactly-n constraints for every fixed row and column
    fn generate_count_constraints(&mut self, puzzle: &SnakePuzzle) -> Result<Vec<Clause>, SolverError> {
        let mut clauses = Vec::new();

        for (row, count) in puzzle.row_counts().iter().enumerate() {
            if let LineCount::Fixed(n) = *count {
                let cells: Vec<Cell> = self.size.row_cells(row).collect();
                clauses.extend(self.line_constraint(&cells, n)?);
            }
        }
        for (col, count) in puzzle.col_counts().iter().enumerate() {
            if let LineCount::Fixed(n) = *count {
                let cells: Vec<Cell> = self.size.col_cells(col).collect();
                clauses.extend(self.line_constraint(&cells, n)?);
            }
        }

        Ok(clauses)
    }

    fn line_constraint(&mut self, cells: &[Cell], n: usize) -> Result<Vec<Clause>, SolverError> {
        let literals = cells
            .iter()
            .map(|&cell| self.variable_manager.cell_variable(cell))
            .collect::<Result<Vec<_>, _>>()?;
        self.exactly_k(&literals, n)
    }

    /// Two diagonal cells on the snake need a bridge cell on the snake:
    /// x[p] + x[q] - x[b1] - x[b2] <= 1
    fn generate_bridge_constraints(&mut self) -> Result<Vec<Clause>, SolverError> {
        let mut clauses = Vec::new();

        for (p, q, [b1, b2]) in SnakeRules::diagonal_pairs(self.size) {
            clauses.push(Clause::new(vec![
                -self.variable_manager.cell_variable(p)?,
                -self.variable_manager.cell_variable(q)?,
                self.variable_manager.cell_variable(b1)?,
                self.variable_manager.cell_variable(b2)?,
            ]));
        }

        Ok(clauses)
    }

    /// A selected endpoint has exactly one selected neighbor, any other
    /// selected cell exactly two. Unselected cells are unconstrained.
    fn generate_degree_constraints(&mut self, puzzle: &SnakePuzzle) -> Result<Vec<Clause>, SolverError> {
        let mut clauses = Vec::new();
        let cells: Vec<Cell> = self.size.cells().collect();

        for cell in cells {
            let guard = -self.variable_manager.cell_variable(cell)?;
            let neighbors = self
                .size
                .orthogonal_neighbors(cell)
                .collect_vec();
            let neighbors = neighbors
                .into_iter()
                .map(|n| self.variable_manager.cell_variable(n))
                .collect::<Result<Vec<_>, _>>()?;
            let degree = if puzzle.is_endpoint(cell) { 1 } else { 2 };

            clauses.extend(guarded_exactly(guard, &neighbors, degree));
        }

        Ok(clauses)
    }

    /// Forbid `component` from being selected as a detached piece.
    ///
    /// If every cell of the component is on the snake and it does not contain
    /// the start, some cell on its outer boundary must be on the snake too.
    pub fn component_cut(&mut self, component: &BTreeSet<Cell>) -> Result<Clause, SolverError> {
        let boundary: BTreeSet<Cell> = component
            .iter()
            .flat_map(|&cell| self.size.orthogonal_neighbors(cell).collect_vec())
            .filter(|n| !component.contains(n))
            .collect();

        let mut literals = Vec::with_capacity(component.len() + boundary.len());
        for &cell in component {
            literals.push(-self.variable_manager.cell_variable(cell)?);
        }
        for &cell in &boundary {
            literals.push(self.variable_manager.cell_variable(cell)?);
        }

        self.statistics.cut_clauses += 1;
        Ok(Clause::new(literals))
    }

    /// Exactly `k` of `literals` are true, via a sequential counter.
    ///
    /// `r[i][j]` means "at least j+1 of the first i+1 literals are true" and is
    /// defined in both directions, so asserting `r[n-1][k-1]` and refuting
    /// `r[n-1][k]` pins the count.
    pub fn exactly_k(&mut self, literals: &[i32], k: usize) -> Result<Vec<Clause>, SolverError> {
        let n = literals.len();
        if k > n {
            return Err(SolverError::EmptyClause);
        }
        if k == 0 {
            return Ok(literals.iter().map(|&l| Clause::unit(-l)).collect());
        }
        if k == n {
            return Ok(literals.iter().map(|&l| Clause::unit(l)).collect());
        }

        let mut clauses = Vec::new();
        let mut registers: Vec<Vec<i32>> = Vec::with_capacity(n);

        for (i, &x) in literals.iter().enumerate() {
            // At most k+1 registers are needed, and the first i+1 literals
            // cannot reach more than i+1
            let width = (i + 1).min(k + 1);
            let mut row = Vec::with_capacity(width);
            for _ in 0..width {
                row.push(self.variable_manager.auxiliary_variable()?);
            }

            for (j, &r) in row.iter().enumerate() {
                let previous = registers.last();
                // r[i-1][j], absent when it would count past i literals
                let carry = previous.and_then(|p| p.get(j)).copied();
                // r[i-1][j-1], where "at least 0" is always true
                let below = if j == 0 { None } else { previous.and_then(|p| p.get(j - 1)).copied() };

                // carry -> r
                if let Some(carry) = carry {
                    clauses.push(Clause::binary(-carry, r));
                }
                // x & below -> r
                match below {
                    Some(below) => clauses.push(Clause::new(vec![-x, -below, r])),
                    None if j == 0 => clauses.push(Clause::binary(-x, r)),
                    None => {}
                }
                // r -> carry | x
                let mut support = vec![-r, x];
                support.extend(carry);
                clauses.push(Clause::new(support));
                // r -> carry | below
                if j > 0 {
                    let mut support = vec![-r];
                    support.extend(carry);
                    support.extend(below);
                    clauses.push(Clause::new(support));
                }
            }

            registers.push(row);
        }

        let last = &registers[n - 1];
        clauses.push(Clause::unit(last[k - 1]));
        if let Some(&over) = last.get(k) {
            clauses.push(Clause::unit(-over));
        }

        Ok(clauses)
    }

    /// Get the variable manager (for external access)
    pub fn variable_manager(&mut self) -> &mut VariableManager {
        &mut self.variable_manager
    }

    /// Read-only view of the variable manager
    pub fn variables(&self) -> &VariableManager {
        &self.variable_manager
    }

    pub fn statistics(&self) -> &ConstraintStatistics {
        &self.statistics
    }
}

/// `guard | exactly-degree(neighbors)` for degree 1 or 2, spelled out with
/// small combinations since a cell has at most four neighbors
fn guarded_exactly(guard: i32, neighbors: &[i32], degree: usize) -> Vec<Clause> {
    let n = neighbors.len();
    let mut clauses = Vec::new();

    if n < degree {
        clauses.push(Clause::unit(guard));
        return clauses;
    }

    // At least `degree`: every (n - degree + 1)-subset holds a true literal
    for subset in neighbors.iter().copied().combinations(n - degree + 1) {
        let mut literals = vec![guard];
        literals.extend(subset);
        clauses.push(Clause::new(literals));
    }

    // At most `degree`: no (degree + 1)-subset is all true
    for subset in neighbors.iter().copied().combinations(degree + 1) {
        let mut literals = vec![guard];
        literals.extend(subset.into_iter().map(|l| -l));
        clauses.push(Clause::new(literals));
    }

    clauses
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Brute-force check: which assignments of `n` inputs satisfy the clauses
    /// for some assignment of the auxiliaries?
    fn satisfiable_inputs(n: usize, clauses: &[Clause], total_vars: usize) -> Vec<u32> {
        let aux = total_vars - n;
        let mut result = Vec::new();
        for inputs in 0u32..(1 << n) {
            let ok = (0u32..(1 << aux)).any(|extra| {
                let value = |lit: i32| {
                    let var = lit.unsigned_abs() as usize - 1;
                    let bit = if var < n { inputs >> var & 1 } else { extra >> (var - n) & 1 };
                    (bit == 1) == (lit > 0)
                };
                clauses.iter().all(|c| c.literals.iter().any(|&l| value(l)))
            });
            if ok {
                result.push(inputs);
            }
        }
        result
    }

    #[test]
    fn test_clause_creation() {
        let clause = Clause::new(vec![1, -2, 3]);
        assert_eq!(clause.literals, vec![1, -2, 3]);
        assert!(!clause.is_empty());

        assert_eq!(Clause::unit(5).literals, vec![5]);
        assert_eq!(Clause::binary(-1, 2).literals, vec![-1, 2]);
        assert!(Clause::new(vec![]).is_empty());
    }

    #[test]
    fn test_exactly_k_counts() {
        for n in 1..=5usize {
            for k in 0..=n {
                let mut cg = ConstraintGenerator::new(GridSize::new(1, n));
                let literals = cg.variable_manager().all_cell_variables().unwrap();
                let clauses = cg.exactly_k(&literals, k).unwrap();
                let total = cg.variables().variable_count();

                let expected: Vec<u32> = (0u32..(1 << n)).filter(|v| v.count_ones() as usize == k).collect();
                assert_eq!(satisfiable_inputs(n, &clauses, total), expected, "n={} k={}", n, k);
            }
        }
    }

    #[test]
    fn test_exactly_k_over_length_fails() {
        let mut cg = ConstraintGenerator::new(GridSize::new(1, 2));
        let literals = cg.variable_manager().all_cell_variables().unwrap();
        assert!(cg.exactly_k(&literals, 3).is_err());
    }

    #[test]
    fn test_guarded_degree_two() {
        // guard is variable 1, neighbors 2..=4
        let clauses = guarded_exactly(-1, &[2, 3, 4], 2);
        let accepted = satisfiable_inputs(4, &clauses, 4);
        for inputs in 0u32..16 {
            let selected = inputs & 1 == 1;
            let degree = (inputs >> 1).count_ones();
            assert_eq!(accepted.contains(&inputs), !selected || degree == 2, "inputs={:04b}", inputs);
        }
    }

    #[test]
    fn test_guarded_degree_without_neighbors() {
        assert_eq!(guarded_exactly(-7, &[3], 2), vec![Clause::unit(-7)]);
    }

    #[test]
    fn test_bridge_clause_shape() {
        let puzzle = SnakePuzzle::with_counts(&[1, 1], &[1, 1], (0, 0), (1, 1)).unwrap();
        let mut cg = ConstraintGenerator::new(puzzle.size());
        cg.generate_all_constraints(&puzzle).unwrap();
        assert_eq!(cg.statistics().bridge_clauses, 2);

        let bridges = cg.generate_bridge_constraints().unwrap();
        // (0,0)-(1,1) needs (0,1) or (1,0): variables 1,4 and 2,3
        assert_eq!(bridges[0].literals, vec![-1, -4, 2, 3]);
    }

    #[test]
    fn test_component_cut() {
        let mut cg = ConstraintGenerator::new(GridSize::new(3, 3));
        cg.variable_manager().all_cell_variables().unwrap();

        let component: BTreeSet<Cell> = [Cell::new(0, 0), Cell::new(0, 1)].into_iter().collect();
        let cut = cg.component_cut(&component).unwrap();
        // -x(0,0) -x(0,1) | x(0,2) x(1,0) x(1,1)
        assert_eq!(cut.literals, vec![-1, -2, 3, 4, 5]);
        assert_eq!(cg.statistics().cut_clauses, 1);
    }
}
