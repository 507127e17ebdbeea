//! CSV report tables.
//!
//! Writes the two per-frame metric tables:
//! - `cputime.csv`: frame CPU total plus one column per stage
//! - `latency.csv`: frame latency, per-stage latencies, and the three
//!   scheduling-overhead proxy columns
//!
//! Both tables cover the counted frames only (the final frame of the trace
//! is dropped) and end with an `Avg` row.

use crate::aggregator::{FrameRecord, RunSummary};
use crate::registry::{NamedGap, StageRegistry};
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the per-frame CPU-time table
///
/// **Public** - called from the analyze command
///
/// # Arguments
/// * `path` - output CSV path
/// * `registry` - stage catalog providing column labels
/// * `frames` - all FrameRecords of the run, in POC order
/// * `summary` - run aggregates for the trailing `Avg` row
pub fn write_cputime_table(
    path: &Path,
    registry: &StageRegistry,
    frames: &[FrameRecord],
    summary: &RunSummary,
) -> Result<(), OutputError> {
    info!("Writing CPU-time table to: {}", path.display());

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "POC,    CPU, {}", stage_header(registry))?;

    for frame in &frames[..summary.counted_frames()] {
        write!(writer, "{:3}, {:6.1}", frame.poc(), frame.frame_cpu_time())?;
        for stage in 0..registry.len() {
            write!(writer, ", {:5.1}", frame.stage_cpu_time(stage))?;
        }
        writeln!(writer)?;
    }

    write!(writer, "Avg, {:6.1}", summary.average_cpu_time())?;
    for stage in 0..registry.len() {
        write!(writer, ", {:5.1}", summary.average_stage_cpu_time(stage))?;
    }
    writeln!(writer)?;

    Ok(())
}

/// Write the per-frame latency table
///
/// **Public** - called from the analyze command
///
/// Columns: frame latency, one column per stage, then the PAK and PM
/// hand-off gaps, the diagnostic gap, and the run-level unattributed
/// overhead. The overhead is a residual across the whole run, so per-frame
/// cells stay empty and only the `Avg` row carries a value.
pub fn write_latency_table(
    path: &Path,
    registry: &StageRegistry,
    frames: &[FrameRecord],
    summary: &RunSummary,
) -> Result<(), OutputError> {
    info!("Writing latency table to: {}", path.display());

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let diagnostic = registry.diagnostic_gap_stage();
    writeln!(
        writer,
        "POC,   LAT, {}, {}, {}, {}_s, overhead",
        stage_header(registry),
        NamedGap::Pak.label(),
        NamedGap::Pm.label(),
        registry.label(diagnostic).to_lowercase(),
    )?;

    for frame in &frames[..summary.counted_frames()] {
        write!(writer, "{:3}, {:5.1}", frame.poc(), frame.frame_latency(registry))?;
        for stage in 0..registry.len() {
            write!(writer, ", {:5.2}", frame.stage_latency(stage))?;
        }
        writeln!(
            writer,
            ", {:5.2}, {:5.2}, {:5.2},",
            frame.named_gap(registry, NamedGap::Pak),
            frame.named_gap(registry, NamedGap::Pm),
            frame.stage_gap(diagnostic),
        )?;
    }

    write!(writer, "Avg, {:5.1}", summary.average_latency())?;
    for stage in 0..registry.len() {
        write!(writer, ", {:5.2}", summary.average_stage_latency(stage))?;
    }
    writeln!(
        writer,
        ", {:5.2}, {:5.2}, {:5.2}, {:5.2}",
        summary.average_pak_gap(),
        summary.average_pm_gap(),
        summary.average_diagnostic_gap(),
        summary.average_unattributed_overhead(),
    )?;

    Ok(())
}

/// Comma-joined short stage labels
///
/// **Private** - header helper
fn stage_header(registry: &StageRegistry) -> String {
    (0..registry.len())
        .map(|i| registry.label(i))
        .collect::<Vec<_>>()
        .join(", ")
}
