//! SAT solving components for Snake puzzles

pub mod variables;
pub mod constraints;
pub mod encoder;
pub mod solver;

pub use variables::{VariableManager, VariableType};
pub use constraints::{Clause, ConstraintGenerator};
pub use encoder::{EncoderOptions, EncodingStatistics, SatEncoder, SolveOutcome, SolverInfo};
pub use solver::{SatSolver, SolverResultType, SolverSolution};
