//! Main CLI application for the Snake puzzle generator and solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snake_sat::{
    config::{CliOverrides, OutputFormat, Settings},
    generate::PathGenerator,
    sat::{SatEncoder, SolveOutcome},
    snake::{
        create_example_puzzles, example_puzzle, io::load_solution_from_file, io::save_solution_to_file,
        load_puzzle_from_file, save_puzzle_to_file, SnakePuzzle,
    },
    utils::{BoardFormatter, ColorOutput},
};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "snake_sat")]
#[command(about = "Snake Puzzle Generator and SAT Solver")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbose output (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a Snake puzzle
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Puzzle file (overrides config)
        #[arg(short, long, conflicts_with = "example")]
        puzzle: Option<PathBuf>,

        /// Solve a built-in example puzzle instead of a file
        #[arg(short, long)]
        example: Option<String>,

        /// Time budget in seconds, 0 for none (overrides config)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (overrides config)
        #[arg(short, long, value_parser = parse_format)]
        format: Option<OutputFormat>,

        /// Show row and column indices on the board
        #[arg(long)]
        show_indices: bool,
    },

    /// Generate a random puzzle together with its solution
    Generate {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Number of rows (overrides config)
        #[arg(long)]
        rows: Option<usize>,

        /// Number of columns (overrides config)
        #[arg(long)]
        cols: Option<usize>,

        /// Fraction of the grid the snake should cover (overrides config)
        #[arg(long)]
        fill: Option<f64>,

        /// Random seed (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Directory for the puzzle and solution files (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Solve the generated puzzle back from its counts
        #[arg(long)]
        solve: bool,
    },

    /// Check a solution against a puzzle
    Validate {
        /// Puzzle file
        #[arg(short, long)]
        puzzle: PathBuf,

        /// Solution file (JSON list of [row, col] pairs)
        #[arg(short, long)]
        solution: PathBuf,

        /// Show row and column indices on the board
        #[arg(long)]
        show_indices: bool,
    },

    /// Create the default configuration and example puzzles
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    match value.to_ascii_lowercase().as_str() {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        "visual" => Ok(OutputFormat::Visual),
        other => Err(format!("unknown format '{}' (expected text, json or visual)", other)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            config, puzzle, example, timeout, output, format, show_indices,
        } => {
            let overrides = CliOverrides {
                timeout_seconds: timeout,
                puzzle_file: puzzle,
                output_dir: output,
                format,
                ..CliOverrides::default()
            };
            solve_command(config, overrides, example, show_indices, cli.verbose > 0)
        }
        Commands::Generate {
            config, rows, cols, fill, seed, output, solve,
        } => {
            let overrides = CliOverrides {
                rows,
                cols,
                fill_percentage: fill,
                seed,
                output_dir: output,
                ..CliOverrides::default()
            };
            generate_command(config, overrides, solve)
        }
        Commands::Validate { puzzle, solution, show_indices } => {
            validate_command(puzzle, solution, show_indices)
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Ignore a second initialization
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).try_init();
}

/// Load the config file if present, otherwise fall back to defaults
fn load_settings(config_path: &Path, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!("Config file {} not found, using defaults", config_path.display()))
        );
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn solve_command(
    config_path: PathBuf,
    overrides: CliOverrides,
    example: Option<String>,
    show_indices: bool,
    verbose: bool,
) -> Result<()> {
    println!("{}", ColorOutput::info("🐍 Starting Snake Puzzle Solver"));

    let settings = load_settings(&config_path, &overrides)?;

    let (name, puzzle) = match example {
        Some(name) => {
            let puzzle = example_puzzle(&name)?;
            (name, puzzle)
        }
        None => {
            settings.validate_input()?;
            let path = &settings.input.puzzle_file;
            let puzzle = load_puzzle_from_file(path)
                .with_context(|| format!("Failed to load puzzle from {}", path.display()))?;
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("puzzle")
                .to_string();
            (name, puzzle)
        }
    };

    if verbose {
        println!("Configuration:");
        println!("  Puzzle: {} ({})", name, puzzle.size());
        println!("  Timeout: {}s", settings.solver.timeout_seconds);
        println!("  Max cut rounds: {}", settings.solver.max_cut_rounds);
        println!("  Output dir: {}", settings.output.output_directory.display());
        println!();
    }

    println!("\nPuzzle:");
    println!("{}", BoardFormatter::format_board(&puzzle, None, show_indices));

    let mut encoder = SatEncoder::with_options(&puzzle, settings.encoder_options())
        .context("Failed to encode puzzle")?;
    println!("{}", encoder.info());
    if verbose {
        println!("{}", encoder.encoding_statistics());
    }

    println!("{}", ColorOutput::info("🧮 Solving..."));
    let start_time = Instant::now();
    let outcome = encoder.solve(settings.solve_budget()).context("Solver failed")?;
    let total_time = start_time.elapsed();

    let solution = match outcome {
        SolveOutcome::Solved(solution) => solution,
        SolveOutcome::NoSolution => {
            println!(
                "{}",
                ColorOutput::warning(&format!("❌ No solution exists (took {:.3}s)", total_time.as_secs_f64()))
            );
            return Ok(());
        }
        SolveOutcome::Unknown => {
            println!(
                "{}",
                ColorOutput::warning(&format!(
                    "⏱️  No answer within the budget (took {:.3}s)",
                    total_time.as_secs_f64()
                ))
            );
            return Ok(());
        }
    };

    println!(
        "{}",
        ColorOutput::success(&format!(
            "✅ Solution found in {:.3}s ({} cells)",
            total_time.as_secs_f64(),
            solution.len()
        ))
    );
    println!("Solution: {}", BoardFormatter::format_cells(&solution));
    println!("\n{}", BoardFormatter::format_board(&puzzle, Some(&solution), show_indices));

    if puzzle.validate(&solution) {
        println!("{}", ColorOutput::success("✅ Solution is valid!"));
    } else {
        println!("{}", ColorOutput::error("❌ Solution validation failed!"));
    }

    let path = BoardFormatter::save_solution(
        &puzzle,
        &solution,
        &name,
        &settings.output.output_directory,
        settings.output.format,
    )
    .context("Failed to save solution")?;
    println!("{}", ColorOutput::success(&format!("Solution saved to {}", path.display())));

    if verbose {
        println!("\n{}", encoder.info());
        println!("{}", encoder.encoding_statistics());
    }

    Ok(())
}

fn generate_command(config_path: PathBuf, overrides: CliOverrides, solve_back: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🎲 Generating Snake puzzle"));

    let settings = load_settings(&config_path, &overrides)?;
    let seed = settings.generator.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let generator = PathGenerator::new(settings.generator_options());
    let (puzzle, solution) = generator
        .generate(
            settings.generator.rows,
            settings.generator.cols,
            settings.generator.fill_percentage,
            &mut rng,
        )
        .context("Puzzle generation failed")?;

    println!(
        "{}",
        ColorOutput::success(&format!(
            "✅ Generated {} puzzle with a {}-cell snake (seed {})",
            puzzle.size(),
            solution.len(),
            seed
        ))
    );
    println!("\n{}", BoardFormatter::format_board(&puzzle, None, false));
    println!("Solution:\n{}", BoardFormatter::format_board(&puzzle, Some(&solution), false));

    let stem = format!("snake_{}x{}_{}", puzzle.rows(), puzzle.cols(), seed);
    let dir = &settings.output.output_directory;
    let puzzle_path = dir.join(format!("{}.yaml", stem));
    let solution_path = dir.join(format!("{}_solution.json", stem));
    save_puzzle_to_file(&puzzle, &puzzle_path)?;
    save_solution_to_file(&solution, &solution_path)?;
    println!("Created: {}", puzzle_path.display());
    println!("Created: {}", solution_path.display());

    if solve_back {
        solve_generated(&puzzle, &settings)?;
    }

    Ok(())
}

fn solve_generated(puzzle: &SnakePuzzle, settings: &Settings) -> Result<()> {
    println!("\n{}", ColorOutput::info("🧮 Solving the generated puzzle from its counts..."));
    let mut encoder = SatEncoder::with_options(puzzle, settings.encoder_options())?;
    let outcome = encoder.solve(settings.solve_budget())?;
    let info = encoder.info();

    match outcome {
        SolveOutcome::Solved(found) => println!(
            "{}",
            ColorOutput::success(&format!(
                "✅ Solved back in {:.3}s after {} cuts ({} cells)",
                info.solve_time.as_secs_f64(),
                info.cuts,
                found.len()
            ))
        ),
        SolveOutcome::NoSolution => println!("{}", ColorOutput::error("❌ Solver reports no solution")),
        SolveOutcome::Unknown => println!("{}", ColorOutput::warning("⏱️  Solver ran out of budget")),
    }
    Ok(())
}

fn validate_command(puzzle_path: PathBuf, solution_path: PathBuf, show_indices: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🔍 Validating solution..."));

    let puzzle = load_puzzle_from_file(&puzzle_path)
        .with_context(|| format!("Failed to load puzzle from {}", puzzle_path.display()))?;
    let solution = load_solution_from_file(&solution_path)
        .with_context(|| format!("Failed to load solution from {}", solution_path.display()))?;

    println!("{}", BoardFormatter::format_board(&puzzle, Some(&solution), show_indices));

    match puzzle.check(&solution) {
        Ok(()) => println!("{}", ColorOutput::success("✅ Solution is valid!")),
        Err(violation) => {
            println!("{}", ColorOutput::error("❌ Solution is invalid"));
            println!("Error: {}", violation);
        }
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input/puzzles");
    let output_dir = directory.join("output/solutions");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_puzzles(&input_dir).context("Failed to create example puzzles")?;
    println!("Created example puzzles in: {}", input_dir.display());

    println!("\n{}", ColorOutput::success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your puzzles to {}", input_dir.display());
    println!("3. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}
