//! File I/O for Snake puzzles and solutions

use super::{Cell, LineCount, SnakePuzzle, Solution};
use anyhow::{Context, Result};
use std::path::Path;

/// Puzzle file encodings, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleFormat {
    Yaml,
    Json,
}

impl PuzzleFormat {
    /// `.json` files are JSON, everything else is read as YAML
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => PuzzleFormat::Json,
            _ => PuzzleFormat::Yaml,
        }
    }
}

/// Load a puzzle from a YAML or JSON file
pub fn load_puzzle_from_file<P: AsRef<Path>>(path: P) -> Result<SnakePuzzle> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read puzzle file: {}", path.display()))?;

    parse_puzzle(&content, PuzzleFormat::from_path(path))
        .with_context(|| format!("Failed to parse puzzle from file: {}", path.display()))
}

/// Parse a puzzle from a string in the given format
pub fn parse_puzzle(content: &str, format: PuzzleFormat) -> Result<SnakePuzzle> {
    let puzzle = match format {
        PuzzleFormat::Yaml => serde_yaml::from_str(content).context("Invalid puzzle YAML")?,
        PuzzleFormat::Json => serde_json::from_str(content).context("Invalid puzzle JSON")?,
    };
    Ok(puzzle)
}

/// Save a puzzle, encoding it according to the file extension
pub fn save_puzzle_to_file<P: AsRef<Path>>(puzzle: &SnakePuzzle, path: P) -> Result<()> {
    let path = path.as_ref();
    let content = match PuzzleFormat::from_path(path) {
        PuzzleFormat::Yaml => serde_yaml::to_string(puzzle).context("Failed to serialize puzzle")?,
        PuzzleFormat::Json => serde_json::to_string_pretty(puzzle).context("Failed to serialize puzzle")?,
    };
    write_with_parents(path, content)
}

/// Load a solution saved as a JSON list of `[row, col]` pairs
pub fn load_solution_from_file<P: AsRef<Path>>(path: P) -> Result<Solution> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read solution file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse solution from file: {}", path.display()))
}

/// Save a solution as a JSON list of `[row, col]` pairs
pub fn save_solution_to_file<P: AsRef<Path>>(solution: &Solution, path: P) -> Result<()> {
    let content = serde_json::to_string_pretty(solution).context("Failed to serialize solution")?;
    write_with_parents(path.as_ref(), content)
}

fn write_with_parents(path: &Path, content: String) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(())
}

fn counts(values: &[Option<usize>]) -> Vec<LineCount> {
    values.iter().copied().map(LineCount::from).collect()
}

/// Built-in example puzzles, by name
pub fn example_puzzles() -> Result<Vec<(&'static str, SnakePuzzle)>> {
    Ok(vec![
        (
            "3x3",
            SnakePuzzle::with_counts(&[2, 1, 2], &[1, 3, 1], (0, 0), (2, 2))?,
        ),
        (
            "diagonal_touching",
            SnakePuzzle::with_counts(&[2, 3, 3, 0, 0], &[0, 3, 2, 2, 1], (0, 2), (1, 4))?,
        ),
        (
            "adjacent_touching",
            SnakePuzzle::with_counts(&[1, 4, 3, 0], &[3, 2, 1, 2], (0, 0), (3, 3))?,
        ),
        (
            "6x6_easy",
            SnakePuzzle::with_counts(&[1, 1, 1, 3, 2, 5], &[4, 3, 1, 1, 1, 3], (0, 0), (3, 5))?,
        ),
        (
            "12x12_evil",
            SnakePuzzle::new(
                counts(&[
                    Some(11), Some(2), Some(7), Some(4), Some(4), None,
                    None, None, Some(3), Some(2), None, Some(5),
                ]),
                counts(&[
                    Some(9), Some(7), None, Some(2), Some(5), Some(6),
                    None, None, Some(5), None, None, None,
                ]),
                Cell::new(2, 6),
                Cell::new(7, 5),
            )?,
        ),
    ])
}

/// Look up a built-in example puzzle
pub fn example_puzzle(name: &str) -> Result<SnakePuzzle> {
    example_puzzles()?
        .into_iter()
        .find(|(n, _)| *n == name)
        .map(|(_, puzzle)| puzzle)
        .with_context(|| format!("Unknown example puzzle: {}", name))
}

/// Write every example puzzle as `<name>.yaml` into `dir`
pub fn create_example_puzzles<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    for (name, puzzle) in example_puzzles()? {
        save_puzzle_to_file(&puzzle, dir.join(format!("{}.yaml", name)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_example_puzzles_construct() {
        let examples = example_puzzles().unwrap();
        assert_eq!(examples.len(), 5);

        let evil = example_puzzle("12x12_evil").unwrap();
        assert_eq!(evil.rows(), 12);
        assert!(!evil.is_fully_specified());
        assert!(example_puzzle("missing").is_err());
    }

    #[test]
    fn test_yaml_and_json_files() {
        let dir = tempdir().unwrap();
        let puzzle = example_puzzle("12x12_evil").unwrap();

        for name in ["evil.yaml", "evil.json"] {
            let path = dir.path().join(name);
            save_puzzle_to_file(&puzzle, &path).unwrap();
            assert_eq!(load_puzzle_from_file(&path).unwrap(), puzzle);
        }
    }

    #[test]
    fn test_invalid_puzzle_file_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "row_counts: [1]\ncol_counts: [1]\nstart: [0, 0]\nend: [0, 0]\n").unwrap();
        assert!(load_puzzle_from_file(&path).is_err());
    }

    #[test]
    fn test_create_example_puzzles() {
        let dir = tempdir().unwrap();
        create_example_puzzles(dir.path()).unwrap();
        assert!(dir.path().join("3x3.yaml").exists());
        assert!(dir.path().join("12x12_evil.yaml").exists());
    }

    #[test]
    fn test_solution_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/solution.json");
        let solution: Solution = [Cell::new(0, 0), Cell::new(0, 1)].into_iter().collect();
        save_solution_to_file(&solution, &path).unwrap();
        assert_eq!(load_solution_from_file(&path).unwrap(), solution);
    }
}
