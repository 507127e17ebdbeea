//! Trace record parser.
//!
//! Decodes one comma-space-delimited trace line into a typed [`TraceEvent`].
//! Line layout (the first line of a trace file is a header and is skipped by
//! [`parse_events`], not by the line parser):
//!
//! ```text
//! STAGE_NAME, inType, outType, frameIndex, segmentIndex, tileIndex, startTime, endTime, duration
//! ```

use crate::utils::config::{FIELD_DELIMITER, TRACE_FIELD_COUNT};
use crate::utils::error::ParseError;
use log::debug;
use std::io::BufRead;
use std::str::FromStr;

/// One timed event emitted by a pipeline stage
///
/// Immutable, one per trace line. `duration` is the event's CPU-busy time
/// and may be smaller than `end_time - start_time` when the stage yields.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEvent {
    /// Stage name as written by the trace producer (may be unknown to the registry)
    pub stage: String,

    /// Input type tag, stage-specific
    pub in_type: i32,

    /// Output type tag; distinguishes sub-event roles within a stage
    pub out_type: i32,

    /// Frame this event belongs to (POC - picture order count)
    pub frame_index: usize,

    /// Spatial segment within the frame, for stages that parallelize
    pub segment_index: u32,

    /// Tile within the frame, for stages that parallelize
    pub tile_index: u32,

    /// Wall-clock start timestamp (milliseconds, monotonic within a run)
    pub start_time: f64,

    /// Wall-clock end timestamp
    pub end_time: f64,

    /// CPU-busy duration of this event
    pub duration: f64,
}

/// Parse one trace line into a [`TraceEvent`]
///
/// **Public** - main entry point for single-record parsing
///
/// # Arguments
/// * `line` - one raw trace line, without trailing newline handling required
/// * `line_number` - 1-based line number, carried into errors
///
/// # Errors
/// * `ParseError::FieldCount` - the line does not split into exactly 9 fields
/// * `ParseError::InvalidNumber` - a numeric field fails to parse
pub fn parse_line(line: &str, line_number: usize) -> Result<TraceEvent, ParseError> {
    let fields: Vec<&str> = line.trim_end().split(FIELD_DELIMITER).collect();

    if fields.len() != TRACE_FIELD_COUNT {
        return Err(ParseError::FieldCount {
            line: line_number,
            expected: TRACE_FIELD_COUNT,
            found: fields.len(),
        });
    }

    Ok(TraceEvent {
        stage: fields[0].to_string(),
        in_type: parse_field(fields[1], "inType", line_number)?,
        out_type: parse_field(fields[2], "outType", line_number)?,
        frame_index: parse_field(fields[3], "frameIndex", line_number)?,
        segment_index: parse_field(fields[4], "segmentIndex", line_number)?,
        tile_index: parse_field(fields[5], "tileIndex", line_number)?,
        start_time: parse_field(fields[6], "startTime", line_number)?,
        end_time: parse_field(fields[7], "endTime", line_number)?,
        duration: parse_field(fields[8], "duration", line_number)?,
    })
}

/// Parse a single numeric field with a structured error
///
/// **Private** - internal helper for parse_line
fn parse_field<T: FromStr>(
    raw: &str,
    field: &'static str,
    line: usize,
) -> Result<T, ParseError> {
    raw.trim().parse::<T>().map_err(|_| ParseError::InvalidNumber {
        line,
        field,
        value: raw.to_string(),
    })
}

/// Parse a whole trace stream into events
///
/// **Public** - main entry point for file parsing
///
/// Skips the first line (column header), then parses every remaining line.
/// Fail-fast: the first malformed line aborts the run with its line number.
pub fn parse_events<R: BufRead>(reader: R) -> Result<Vec<TraceEvent>, ParseError> {
    let mut events = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if index == 0 {
            // header line
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        events.push(parse_line(&line, index + 1)?);
    }

    debug!("Parsed {} trace events", events.len());

    Ok(events)
}
