//! Trace record parsing.
//!
//! This module handles:
//! - Decoding raw trace lines into typed events
//! - Skipping the trace header line
//! - Fail-fast reporting of malformed records

pub mod record;

// Re-export main types
pub use record::{parse_events, parse_line, TraceEvent};
