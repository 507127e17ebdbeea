//! CLI command implementations.

pub mod analyze;

// Re-export command entry points
pub use analyze::{execute_analyze, validate_args, AnalyzeArgs};
