//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::snake::io::save_solution_to_file;
use crate::snake::{Cell, SnakePuzzle, Solution};
use anyhow::{Context, Result};
use itertools::Itertools;
use std::path::{Path, PathBuf};

const SNAKE_CELL: char = '█';
const EMPTY_CELL: char = '·';

/// Renders puzzles and solved boards as text
pub struct BoardFormatter;

impl BoardFormatter {
    /// Render the board with column counts on top and row counts on the right.
    ///
    /// Start and end are marked `S` and `E`, other snake cells with a block.
    /// `show_indices` adds row and column numbers.
    pub fn format_board(puzzle: &SnakePuzzle, solution: Option<&Solution>, show_indices: bool) -> String {
        let mut output = String::new();
        let prefix = |label: Option<usize>| match (show_indices, label) {
            (false, _) => String::new(),
            (true, Some(row)) => format!("{:>2} ", row % 100),
            (true, None) => "   ".to_string(),
        };

        if show_indices {
            output.push_str(&prefix(None));
            for col in 0..puzzle.cols() {
                output.push_str(&format!("{:>2}", col % 10));
            }
            output.push('\n');
        }

        // Column counts
        output.push_str(&prefix(None));
        for count in puzzle.col_counts() {
            output.push_str(&format!("{:>2}", count.to_string()));
        }
        output.push('\n');

        for (row, count) in puzzle.row_counts().iter().enumerate() {
            output.push_str(&prefix(Some(row)));
            for col in 0..puzzle.cols() {
                output.push(' ');
                output.push(Self::cell_symbol(puzzle, solution, Cell::new(row, col)));
            }
            output.push_str(&format!("  {}\n", count));
        }

        output
    }

    fn cell_symbol(puzzle: &SnakePuzzle, solution: Option<&Solution>, cell: Cell) -> char {
        if cell == puzzle.start() {
            'S'
        } else if cell == puzzle.end() {
            'E'
        } else if solution.is_some_and(|s| s.contains(cell)) {
            SNAKE_CELL
        } else {
            EMPTY_CELL
        }
    }

    /// Sorted cell list on one line
    pub fn format_cells(solution: &Solution) -> String {
        solution.iter().map(|cell| cell.to_string()).join(", ")
    }

    /// Save a solution under `output_dir` as `<name>.<ext>` and return the path
    pub fn save_solution<P: AsRef<Path>>(
        puzzle: &SnakePuzzle,
        solution: &Solution,
        name: &str,
        output_dir: P,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        let path = match format {
            OutputFormat::Text => {
                let path = output_dir.join(format!("{}.txt", name));
                let content = format!("{}\n", Self::format_cells(solution));
                std::fs::write(&path, content)
                    .with_context(|| format!("Failed to write file: {}", path.display()))?;
                path
            }
            OutputFormat::Json => {
                let path = output_dir.join(format!("{}.json", name));
                save_solution_to_file(solution, &path)?;
                path
            }
            OutputFormat::Visual => {
                let path = output_dir.join(format!("{}_visual.txt", name));
                let content = Self::format_board(puzzle, Some(solution), true);
                std::fs::write(&path, content)
                    .with_context(|| format!("Failed to write file: {}", path.display()))?;
                path
            }
        };

        Ok(path)
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
