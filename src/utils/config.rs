//! Configuration and constants for the CLI.

/// Current summary schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Trace record layout
// One event per line, comma-space delimited:
// STAGE, inType, outType, frameIndex, segmentIndex, tileIndex, startTime, endTime, duration
pub const FIELD_DELIMITER: &str = ", ";
pub const TRACE_FIELD_COUNT: usize = 9;

/// `outType` value marking a sub-event that duplicates work already
/// counted by a companion sub-event of the same stage
pub const DUPLICATE_SUB_EVENT_OUT_TYPE: i32 = 0;

// Canonical pipeline stages, in execution order. The two lists are
// parallel: full names appear in trace records, short labels in reports.
pub const STAGE_FULL_NAMES: &[&str] = &[
    "RESOURCE", "PA", "PD", "ME", "IRC", "SRC", "PM", "RC", "MDC", "ENCDEC", "ENTROPY", "PAK",
];
pub const STAGE_LABELS: &[&str] = &[
    "RES", "PA", "PD", "ME", "IRC", "SRC", "PM", "RC", "MDC", "ENC", "ENT", "PAK",
];

/// Cap on the number of per-frame raw split files written by `--split-frames`
pub const MAX_SPLIT_FRAMES: usize = 30;

// Output file names inside the analysis directory
pub const CPUTIME_TABLE_FILE: &str = "cputime.csv";
pub const LATENCY_TABLE_FILE: &str = "latency.csv";
pub const SUMMARY_FILE: &str = "summary.json";
pub const FRAMES_SUBDIR: &str = "frames";
