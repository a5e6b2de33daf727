//! SAT solver integration using CaDiCaL

use super::constraints::Clause;
use crate::error::SolverError;
use cadical::{Solver, Timeout};
use log::trace;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Name reported in solver info
pub const SOLVER_NAME: &str = "CaDiCaL";

/// Incremental SAT solver wrapper for CaDiCaL
pub struct SatSolver {
    solver: Solver<Timeout>,
    variable_count: usize,
    clause_count: usize,
}

/// Model of a satisfiable call
#[derive(Debug, Clone)]
pub struct SolverSolution {
    pub assignment: HashMap<i32, bool>,
    pub solve_time: Duration,
}

impl SolverSolution {
    /// Value of a variable, unassigned counts as false
    pub fn value(&self, var: i32) -> bool {
        self.assignment.get(&var).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverResultType {
    Satisfiable,
    Unsatisfiable,
    Timeout,
}

impl std::fmt::Display for SolverResultType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SolverResultType::Satisfiable => "satisfiable",
            SolverResultType::Unsatisfiable => "unsatisfiable",
            SolverResultType::Timeout => "timeout",
        };
        f.write_str(name)
    }
}

/// Outcome of a single `solve` call
#[derive(Debug, Clone)]
pub enum SolveStatus {
    Satisfiable(SolverSolution),
    Unsatisfiable,
    Timeout,
}

impl SolveStatus {
    pub fn result_type(&self) -> SolverResultType {
        match self {
            SolveStatus::Satisfiable(_) => SolverResultType::Satisfiable,
            SolveStatus::Unsatisfiable => SolverResultType::Unsatisfiable,
            SolveStatus::Timeout => SolverResultType::Timeout,
        }
    }
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SatSolver {
    /// Create a new SAT solver instance
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            variable_count: 0,
            clause_count: 0,
        }
    }

    /// Add clauses to the solver
    pub fn add_clauses(&mut self, clauses: &[Clause]) -> Result<(), SolverError> {
        for clause in clauses {
            self.add_clause(clause)?;
        }
        Ok(())
    }

    /// Add a single clause to the solver
    pub fn add_clause(&mut self, clause: &Clause) -> Result<(), SolverError> {
        if clause.is_empty() {
            return Err(SolverError::EmptyClause);
        }

        for &literal in &clause.literals {
            let var = literal.unsigned_abs() as usize;
            if var > self.variable_count {
                self.variable_count = var;
            }
        }

        self.solver.add_clause(clause.literals.iter().copied());
        self.clause_count += 1;
        Ok(())
    }

    /// Solve the clauses added so far.
    ///
    /// With a `budget` the search is interrupted once it runs out, which is
    /// reported as [`SolveStatus::Timeout`]. Clauses may be added after any
    /// call and the next call reuses what the solver has learned.
    pub fn solve(&mut self, budget: Option<Duration>) -> SolveStatus {
        let start_time = Instant::now();

        self.solver
            .set_callbacks(budget.map(|limit| Timeout::new(limit.as_secs_f32())));
        let result = self.solver.solve();
        let solve_time = start_time.elapsed();
        trace!(
            "SAT call on {} variables / {} clauses: {:?} in {:.3}s",
            self.variable_count,
            self.clause_count,
            result,
            solve_time.as_secs_f64()
        );

        match result {
            Some(true) => SolveStatus::Satisfiable(SolverSolution {
                assignment: self.extract_assignment(),
                solve_time,
            }),
            Some(false) => SolveStatus::Unsatisfiable,
            None => SolveStatus::Timeout,
        }
    }

    /// Extract variable assignment from the solver
    fn extract_assignment(&self) -> HashMap<i32, bool> {
        let mut assignment = HashMap::new();

        for var in 1..=self.variable_count as i32 {
            if let Some(value) = self.solver.value(var) {
                assignment.insert(var, value);
            }
        }

        assignment
    }

    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }
}
