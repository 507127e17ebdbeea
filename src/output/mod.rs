//! Report writers.
//!
//! This module handles:
//! - The per-frame CPU-time and latency CSV tables
//! - Optional per-frame raw event split files
//! - The machine-readable JSON run summary

pub mod json;
pub mod split;
pub mod tables;

// Re-export main entry points
pub use json::{build_report, read_report, write_report, RunReport};
pub use split::write_frame_splits;
pub use tables::{write_cputime_table, write_latency_table};
