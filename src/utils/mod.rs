//! Utility modules for output and display

pub mod display;

pub use display::{BoardFormatter, Color, ColorOutput};
