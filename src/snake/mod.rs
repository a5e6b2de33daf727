//! Snake puzzle core: geometry, rules, puzzle model and validation

pub mod grid;
pub mod rules;
pub mod puzzle;
pub mod solution;
pub mod validator;
pub mod io;

pub use grid::{Cell, GridSize};
pub use rules::{Occupancy, SnakeRules};
pub use puzzle::{LineCount, SnakePuzzle};
pub use solution::Solution;
pub use validator::Violation;
pub use io::{load_puzzle_from_file, save_puzzle_to_file, create_example_puzzles, example_puzzle};
