//! Random puzzle generation

pub mod generator;

pub use generator::{GeneratorOptions, PathGenerator};
