//! Configuration settings for the Snake generator and solver

use crate::generate::GeneratorOptions;
use crate::sat::EncoderOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub generator: GeneratorConfig,
    pub solver: SolverConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub rows: usize,
    pub cols: usize,
    pub fill_percentage: f64,
    pub max_attempts: usize,
    /// Fixed seed for reproducible puzzles; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Wall-clock budget; 0 disables the limit
    pub timeout_seconds: u64,
    pub max_cut_rounds: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub puzzle_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Cell list
    Text,
    Json,
    /// Rendered board
    Visual,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig {
                rows: 10,
                cols: 10,
                fill_percentage: 0.3,
                max_attempts: GeneratorOptions::default().max_attempts,
                seed: None,
            },
            solver: SolverConfig {
                timeout_seconds: 300,
                max_cut_rounds: EncoderOptions::default().max_cut_rounds,
            },
            input: InputConfig {
                puzzle_file: PathBuf::from("input/puzzles/3x3.yaml"),
            },
            output: OutputConfig {
                format: OutputFormat::Visual,
                output_directory: PathBuf::from("output/solutions"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.generator.rows == 0 || self.generator.cols == 0 {
            anyhow::bail!(
                "Grid dimensions must be positive (got {}x{})",
                self.generator.rows,
                self.generator.cols
            );
        }

        let fill = self.generator.fill_percentage;
        if !(fill > 0.0 && fill <= 1.0) {
            anyhow::bail!("Fill percentage must be in (0, 1], got {}", fill);
        }

        if self.generator.max_attempts == 0 {
            anyhow::bail!("Maximum generator attempts must be positive");
        }

        if self.solver.max_cut_rounds == 0 {
            anyhow::bail!("Maximum cut rounds must be positive");
        }

        Ok(())
    }

    /// Check that the configured puzzle file is there before solving
    pub fn validate_input(&self) -> Result<()> {
        if !self.input.puzzle_file.exists() {
            anyhow::bail!("Puzzle file does not exist: {}", self.input.puzzle_file.display());
        }
        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(rows) = cli_overrides.rows {
            self.generator.rows = rows;
        }
        if let Some(cols) = cli_overrides.cols {
            self.generator.cols = cols;
        }
        if let Some(fill) = cli_overrides.fill_percentage {
            self.generator.fill_percentage = fill;
        }
        if let Some(seed) = cli_overrides.seed {
            self.generator.seed = Some(seed);
        }
        if let Some(timeout) = cli_overrides.timeout_seconds {
            self.solver.timeout_seconds = timeout;
        }
        if let Some(ref puzzle_file) = cli_overrides.puzzle_file {
            self.input.puzzle_file = puzzle_file.clone();
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
    }

    /// Solver time budget, `None` when unlimited
    pub fn solve_budget(&self) -> Option<Duration> {
        match self.solver.timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            max_attempts: self.generator.max_attempts,
            ..GeneratorOptions::default()
        }
    }

    pub fn encoder_options(&self) -> EncoderOptions {
        EncoderOptions {
            max_cut_rounds: self.solver.max_cut_rounds,
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub fill_percentage: Option<f64>,
    pub seed: Option<u64>,
    pub timeout_seconds: Option<u64>,
    pub puzzle_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}
