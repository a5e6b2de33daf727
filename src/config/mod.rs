//! Configuration management for the Snake generator and solver

pub mod settings;

pub use settings::{
    Settings, GeneratorConfig, SolverConfig, InputConfig, OutputConfig, OutputFormat, CliOverrides,
};
