//! Per-frame raw event splitting.
//!
//! Writes one file per frame containing only that frame's raw trace lines,
//! for manual inspection of a single POC. Capped at the first
//! [`MAX_SPLIT_FRAMES`] counted frames to keep the output directory small.

use crate::parser::parse_line;
use crate::utils::config::MAX_SPLIT_FRAMES;
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Split raw trace content into per-frame files under `out_dir`
///
/// **Public** - called from the analyze command with `--split-frames`
///
/// # Arguments
/// * `content` - the whole trace file, header line included
/// * `frame_count` - total frames in the trace; the final frame and frames
///   beyond the split cap are skipped
/// * `out_dir` - directory receiving `frameNN.csv` files (must exist)
///
/// # Returns
/// Number of split files written
///
/// Lines that fail to parse are skipped silently: the caller has already
/// validated the content with the fail-fast parser.
pub fn write_frame_splits(
    content: &str,
    frame_count: usize,
    out_dir: &Path,
) -> Result<usize, OutputError> {
    let split_count = frame_count.saturating_sub(1).min(MAX_SPLIT_FRAMES);
    let mut buckets: Vec<Vec<&str>> = vec![Vec::new(); split_count];

    for (index, line) in content.lines().enumerate() {
        if index == 0 || line.trim().is_empty() {
            continue;
        }
        let Ok(event) = parse_line(line, index + 1) else {
            continue;
        };
        if let Some(bucket) = buckets.get_mut(event.frame_index) {
            bucket.push(line);
        }
    }

    for (poc, lines) in buckets.iter().enumerate() {
        let path = out_dir.join(format!("frame{poc:02}.csv"));
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        for line in lines {
            writeln!(writer, "{line}")?;
        }
    }

    info!("Wrote {} per-frame split files to {}", split_count, out_dir.display());

    Ok(split_count)
}
