//! JSON run-summary output.
//!
//! Serializes the run-level averages into a machine-readable report,
//! alongside the CSV tables meant for spreadsheets.

use crate::aggregator::RunSummary;
use crate::registry::StageRegistry;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Per-stage averages in the JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub name: String,
    pub label: String,
    pub average_latency: f64,
    pub average_cpu_time: f64,
}

/// Machine-readable run summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Report schema version
    pub version: String,

    /// Trace file the report was derived from
    pub source: String,

    /// Total frames in the trace
    pub frame_count: usize,

    /// Frames counted into averages (final frame dropped)
    pub counted_frames: usize,

    pub average_latency: f64,
    pub max_latency: f64,
    pub average_cpu_time: f64,

    /// Average idle spans of the tracked pipeline hand-offs
    pub average_pak_gap: f64,
    pub average_pm_gap: f64,
    pub average_diagnostic_gap: f64,

    /// Average residual latency; negative when stages overlap in parallel
    pub average_unattributed_overhead: f64,

    pub stages: Vec<StageReport>,

    /// ISO 8601 generation timestamp
    pub generated_at: String,
}

/// Build a [`RunReport`] from run aggregates
///
/// **Public** - called from the analyze command
pub fn build_report(
    registry: &StageRegistry,
    summary: &RunSummary,
    source: &str,
    frame_count: usize,
) -> RunReport {
    let stages = (0..registry.len())
        .map(|i| StageReport {
            name: registry.full_name(i).to_string(),
            label: registry.label(i).to_string(),
            average_latency: summary.average_stage_latency(i),
            average_cpu_time: summary.average_stage_cpu_time(i),
        })
        .collect();

    RunReport {
        version: SCHEMA_VERSION.to_string(),
        source: source.to_string(),
        frame_count,
        counted_frames: summary.counted_frames(),
        average_latency: summary.average_latency(),
        max_latency: summary.max_latency(),
        average_cpu_time: summary.average_cpu_time(),
        average_pak_gap: summary.average_pak_gap(),
        average_pm_gap: summary.average_pm_gap(),
        average_diagnostic_gap: summary.average_diagnostic_gap(),
        average_unattributed_overhead: summary.average_unattributed_overhead(),
        stages,
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Write a report to a JSON file with pretty printing
///
/// **Public** - main entry point for JSON output
pub fn write_report(report: &RunReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    if output_path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    info!("Writing run summary to: {}", output_path.display());

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    Ok(())
}

/// Read a report back from a JSON file
///
/// **Public** - useful for downstream tooling and testing
pub fn read_report(input_path: impl AsRef<Path>) -> Result<RunReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading run summary from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: RunReport = serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    Ok(report)
}
