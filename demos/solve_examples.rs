//! Solve every bundled example puzzle
//!
//! Prints the solver info, the outcome and the solved board for each one.
//! Run with `cargo run --example solve_examples`.

use snake_sat::sat::{SatEncoder, SolveOutcome};
use snake_sat::snake::io::example_puzzles;
use snake_sat::utils::BoardFormatter;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Snake Example Puzzles ===");

    for (name, puzzle) in example_puzzles()? {
        println!("\n{}", "=".repeat(60));
        println!("SOLVING {}", name.to_uppercase());
        println!("{}", "=".repeat(60));

        let mut encoder = SatEncoder::new(&puzzle)?;
        println!("{}", encoder.info());

        match encoder.solve(Some(Duration::from_secs(60)))? {
            SolveOutcome::Solved(solution) => {
                let info = encoder.info();
                println!("Solution found in {:.3}s ({} cells)", info.solve_time.as_secs_f64(), solution.len());
                println!("{}", BoardFormatter::format_board(&puzzle, Some(&solution), false));
                if puzzle.validate(&solution) {
                    println!("✅ Solution is valid!");
                } else {
                    return Err(format!("{} produced an invalid solution", name).into());
                }
            }
            SolveOutcome::NoSolution => println!("No solution exists"),
            SolveOutcome::Unknown => println!("⏱️  No answer within the budget"),
        }
    }

    Ok(())
}
