//! Aggregation of trace events into per-frame and run-level metrics.
//!
//! This module transforms parsed trace events into:
//! - Per-frame, per-stage timing accumulators (fold phase)
//! - Run-level totals, averages and scheduling-overhead residuals

pub mod frame;
pub mod run;

// Re-export main types and functions
pub use frame::{FrameAggregator, FrameRecord, StageAccumulator};
pub use run::{aggregate_run, RunSummary};
