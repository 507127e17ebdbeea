//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Reads the raw trace file
//! 2. Parses every trace line into events
//! 3. Folds events into per-frame stage accumulators
//! 4. Aggregates run-level totals and averages
//! 5. Writes the CSV tables (and optional per-frame splits)
//! 6. Writes the JSON run summary

use crate::aggregator::{aggregate_run, FrameAggregator};
use crate::output::{
    build_report, write_cputime_table, write_frame_splits, write_latency_table, write_report,
};
use crate::parser::parse_events;
use crate::registry::StageRegistry;
use crate::utils::config::{CPUTIME_TABLE_FILE, FRAMES_SUBDIR, LATENCY_TABLE_FILE, SUMMARY_FILE};
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Path to the raw trace file
    pub input: PathBuf,

    /// Total frame count of the encoded sequence
    pub frame_count: usize,

    /// Output directory (None = "<input stem>-ana" next to the input)
    pub out_dir: Option<PathBuf>,

    /// Also write per-frame raw event split files
    pub split_frames: bool,

    /// Print a short run summary to stdout
    pub print_summary: bool,
}

/// Validate arguments before doing any work
///
/// **Public** - called from main.rs before execute_analyze
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if !args.input.is_file() {
        bail!("trace file not found: {}", args.input.display());
    }
    // The final frame is dropped from every aggregate, so a run needs at
    // least two frames to produce any output row.
    if args.frame_count < 2 {
        bail!("frame count must be at least 2, got {}", args.frame_count);
    }
    Ok(())
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    info!("Analyzing trace: {}", args.input.display());
    info!("Expected frames: {}", args.frame_count);

    let registry = StageRegistry::encoder_pipeline();

    // Step 1: Read the trace file
    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read trace file {}", args.input.display()))?;

    // Step 2: Parse trace lines
    let events = parse_events(content.as_bytes()).context("Failed to parse trace file")?;
    debug!("Parsed {} events", events.len());

    // Step 3: Fold events into per-frame accumulators
    let mut aggregator = FrameAggregator::new(&registry, args.frame_count);
    for event in &events {
        aggregator.fold_event(event);
    }
    let frames = aggregator.into_frames();

    // Step 4: Aggregate the run
    let summary = aggregate_run(&registry, &frames);
    info!(
        "Run summary: {} counted frames, avg latency {:.2} ms, max {:.2} ms",
        summary.counted_frames(),
        summary.average_latency(),
        summary.max_latency()
    );

    // Step 5: Write reports
    let out_dir = args.out_dir.clone().unwrap_or_else(|| default_out_dir(&args.input));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    write_cputime_table(&out_dir.join(CPUTIME_TABLE_FILE), &registry, &frames, &summary)
        .context("Failed to write CPU-time table")?;
    write_latency_table(&out_dir.join(LATENCY_TABLE_FILE), &registry, &frames, &summary)
        .context("Failed to write latency table")?;

    if args.split_frames {
        let frames_dir = out_dir.join(FRAMES_SUBDIR);
        std::fs::create_dir_all(&frames_dir).with_context(|| {
            format!("Failed to create split directory {}", frames_dir.display())
        })?;
        write_frame_splits(&content, args.frame_count, &frames_dir)
            .context("Failed to write per-frame split files")?;
    }

    let report = build_report(
        &registry,
        &summary,
        &args.input.display().to_string(),
        args.frame_count,
    );
    write_report(&report, out_dir.join(SUMMARY_FILE)).context("Failed to write run summary")?;

    if args.print_summary {
        println!("Frames:          {} ({} counted)", args.frame_count, summary.counted_frames());
        println!("Average latency: {:7.2} ms", summary.average_latency());
        println!("Max latency:     {:7.2} ms", summary.max_latency());
        println!("Average CPU:     {:7.2} ms", summary.average_cpu_time());
        println!("Overhead (avg):  {:7.2} ms", summary.average_unattributed_overhead());
        println!("Reports written to {}", out_dir.display());
    }

    info!("Analysis complete: {}", out_dir.display());

    Ok(())
}

/// Default output directory: "<input stem>-ana" next to the input file
///
/// **Private** - internal helper
fn default_out_dir(input: &std::path::Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trace".to_string());
    input.with_file_name(format!("{stem}-ana"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_missing_file() {
        let args = AnalyzeArgs {
            input: PathBuf::from("/nonexistent/trace.csv"),
            frame_count: 10,
            out_dir: None,
            split_frames: false,
            print_summary: false,
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_frame_count_too_small() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let args = AnalyzeArgs {
            input: file.path().to_path_buf(),
            frame_count: 1,
            out_dir: None,
            split_frames: false,
            print_summary: false,
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_default_out_dir() {
        let dir = default_out_dir(std::path::Path::new("/tmp/run42.csv"));
        assert_eq!(dir, PathBuf::from("/tmp/run42-ana"));
    }
}
