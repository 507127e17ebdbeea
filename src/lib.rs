//! Enctrace
//!
//! Per-frame latency and CPU-time analysis for video encoder
//! pipeline timing traces.
//!
//! The encoder emits one timed event per trace line (stage, frame index,
//! segment/tile indices, start/end timestamps, CPU-busy duration). This
//! crate reconstructs per-frame, per-stage wall-clock latency and CPU time,
//! derives pipeline-level scheduling-overhead metrics, and writes CSV and
//! JSON reports.
//!
//! ## Getting Started
//!
//! Most users should use the CLI:
//!
//! ```bash
//! enctrace analyze --input trace.csv --frames 120
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod registry;
pub mod utils;
