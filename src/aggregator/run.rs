//! Run-level aggregation across all frames.
//!
//! Sums and averages the per-frame metrics and derives the residual
//! "unattributed overhead". The final frame of a trace is assumed truncated
//! and is excluded from every total and average.

use crate::aggregator::frame::FrameRecord;
use crate::registry::{NamedGap, StageRegistry};
use log::debug;

/// Totals and averages across the counted frames of one run
///
/// All totals sum over `counted_frames` (the trace's frame count minus the
/// dropped final frame); averages divide the totals by the same count.
#[derive(Debug, Clone)]
pub struct RunSummary {
    counted_frames: usize,
    stage_latency_totals: Vec<f64>,
    stage_cpu_totals: Vec<f64>,
    total_latency: f64,
    total_cpu_time: f64,
    max_latency: f64,
    pak_gap_total: f64,
    pm_gap_total: f64,
    diagnostic_gap_total: f64,
    unattributed_overhead: f64,
}

impl RunSummary {
    /// Number of frames counted into totals (frame count minus one)
    pub fn counted_frames(&self) -> usize {
        self.counted_frames
    }

    pub fn total_latency(&self) -> f64 {
        self.total_latency
    }

    pub fn max_latency(&self) -> f64 {
        self.max_latency
    }

    pub fn average_latency(&self) -> f64 {
        self.total_latency / self.counted_frames as f64
    }

    pub fn average_cpu_time(&self) -> f64 {
        self.total_cpu_time / self.counted_frames as f64
    }

    pub fn average_stage_latency(&self, stage: usize) -> f64 {
        self.stage_latency_totals[stage] / self.counted_frames as f64
    }

    pub fn average_stage_cpu_time(&self, stage: usize) -> f64 {
        self.stage_cpu_totals[stage] / self.counted_frames as f64
    }

    /// Average idle span of the ENTROPY-to-PAK hand-off
    pub fn average_pak_gap(&self) -> f64 {
        self.pak_gap_total / self.counted_frames as f64
    }

    /// Average idle span of the SRC-to-PM hand-off
    pub fn average_pm_gap(&self) -> f64 {
        self.pm_gap_total / self.counted_frames as f64
    }

    /// Average generic gap at the registry's diagnostic stage
    pub fn average_diagnostic_gap(&self) -> f64 {
        self.diagnostic_gap_total / self.counted_frames as f64
    }

    /// Residual latency not attributed to any tracked stage or gap
    ///
    /// Total frame-to-frame latency minus every accumulated stage/gap
    /// latency column. Legitimately negative when stages overlap: ENCDEC
    /// and ENTROPY run partially in parallel, so naive summation of their
    /// latencies overcounts.
    pub fn unattributed_overhead(&self) -> f64 {
        self.unattributed_overhead
    }

    pub fn average_unattributed_overhead(&self) -> f64 {
        self.unattributed_overhead / self.counted_frames as f64
    }
}

/// Aggregate finalized frames into a [`RunSummary`]
///
/// **Public** - the RunSummary phase; runs strictly after the fold phase
///
/// # Arguments
/// * `registry` - stage catalog the frames were folded with
/// * `frames` - all FrameRecords of the run, in POC order; the last one is
///   dropped from every total and average
pub fn aggregate_run(registry: &StageRegistry, frames: &[FrameRecord]) -> RunSummary {
    let counted_frames = frames.len().saturating_sub(1);
    let counted = &frames[..counted_frames];

    debug!(
        "Aggregating {} frames ({} counted, final frame dropped)",
        frames.len(),
        counted_frames
    );

    let mut stage_latency_totals = vec![0.0; registry.len()];
    let mut stage_cpu_totals = vec![0.0; registry.len()];
    let mut total_latency = 0.0;
    let mut total_cpu_time = 0.0;
    let mut max_latency = 0.0_f64;
    let mut pak_gap_total = 0.0;
    let mut pm_gap_total = 0.0;
    let mut diagnostic_gap_total = 0.0;

    for frame in counted {
        for stage in 0..registry.len() {
            stage_latency_totals[stage] += frame.stage_latency(stage);
            stage_cpu_totals[stage] += frame.stage_cpu_time(stage);
        }

        let latency = frame.frame_latency(registry);
        total_latency += latency;
        max_latency = max_latency.max(latency);
        total_cpu_time += frame.frame_cpu_time();

        pak_gap_total += frame.named_gap(registry, NamedGap::Pak);
        pm_gap_total += frame.named_gap(registry, NamedGap::Pm);
        diagnostic_gap_total += frame.stage_gap(registry.diagnostic_gap_stage());
    }

    let attributed: f64 = stage_latency_totals.iter().sum::<f64>()
        + pak_gap_total
        + pm_gap_total
        + diagnostic_gap_total;

    RunSummary {
        counted_frames,
        stage_latency_totals,
        stage_cpu_totals,
        total_latency,
        total_cpu_time,
        max_latency,
        pak_gap_total,
        pm_gap_total,
        diagnostic_gap_total,
        unattributed_overhead: total_latency - attributed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::frame::FrameAggregator;
    use crate::parser::TraceEvent;

    fn event(stage: &str, poc: usize, s: f64, e: f64, d: f64) -> TraceEvent {
        TraceEvent {
            stage: stage.to_string(),
            in_type: 0,
            out_type: 1,
            frame_index: poc,
            segment_index: 0,
            tile_index: 0,
            start_time: s,
            end_time: e,
            duration: d,
        }
    }

    /// 5-frame run, each frame a single RESOURCE..PAK pass shifted by 10ms
    fn five_frame_run(registry: &StageRegistry) -> Vec<FrameRecord> {
        let mut agg = FrameAggregator::new(registry, 5);
        for poc in 0..5 {
            let base = poc as f64 * 10.0;
            agg.fold_event(&event("RESOURCE", poc, base, base + 1.0, 1.0));
            agg.fold_event(&event("PAK", poc, base + 5.0, base + 8.0, 2.0));
        }
        agg.into_frames()
    }

    #[test]
    fn test_last_frame_excluded_from_totals_and_averages() {
        let reg = StageRegistry::encoder_pipeline();
        let frames = five_frame_run(&reg);

        // Frame 4 is populated but must contribute to nothing.
        assert_eq!(frames[4].frame_cpu_time(), 3.0);

        let summary = aggregate_run(&reg, &frames);
        assert_eq!(summary.counted_frames(), 4);
        assert_eq!(summary.total_latency(), 4.0 * 8.0);
        assert_eq!(summary.average_latency(), 8.0);
        assert_eq!(summary.average_cpu_time(), 3.0);

        let pak = reg.index_of("PAK").unwrap();
        assert_eq!(summary.average_stage_cpu_time(pak), 2.0);
        assert_eq!(summary.average_stage_latency(pak), 3.0);
    }

    #[test]
    fn test_max_latency_over_counted_frames() {
        let reg = StageRegistry::encoder_pipeline();
        let mut agg = FrameAggregator::new(&reg, 3);
        agg.fold_event(&event("RESOURCE", 0, 0.0, 1.0, 1.0));
        agg.fold_event(&event("PAK", 0, 5.0, 6.0, 1.0));
        agg.fold_event(&event("RESOURCE", 1, 10.0, 11.0, 1.0));
        agg.fold_event(&event("PAK", 1, 15.0, 19.0, 1.0));
        // Final frame has the largest span but is dropped.
        agg.fold_event(&event("RESOURCE", 2, 20.0, 21.0, 1.0));
        agg.fold_event(&event("PAK", 2, 95.0, 99.0, 1.0));

        let summary = aggregate_run(&reg, &agg.into_frames());
        assert_eq!(summary.max_latency(), 9.0);
    }

    #[test]
    fn test_unattributed_overhead_is_the_residual() {
        let reg = StageRegistry::encoder_pipeline();
        let frames = five_frame_run(&reg);
        let summary = aggregate_run(&reg, &frames);

        let mut attributed = 0.0;
        for stage in 0..reg.len() {
            attributed += summary.average_stage_latency(stage) * 4.0;
        }
        attributed += summary.average_pak_gap() * 4.0;
        attributed += summary.average_pm_gap() * 4.0;
        attributed += summary.average_diagnostic_gap() * 4.0;

        let residual = summary.total_latency() - attributed;
        assert!((summary.unattributed_overhead() - residual).abs() < 1e-9);
    }

    #[test]
    fn test_overhead_can_be_negative_with_overlapping_stages() {
        let reg = StageRegistry::encoder_pipeline();
        let mut agg = FrameAggregator::new(&reg, 2);
        // ENCDEC and ENTROPY overlap almost entirely; their summed latencies
        // exceed the frame's end-to-end span.
        agg.fold_event(&event("RESOURCE", 0, 0.0, 1.0, 1.0));
        agg.fold_event(&event("ENCDEC", 0, 1.0, 6.0, 5.0));
        agg.fold_event(&event("ENTROPY", 0, 1.5, 6.5, 5.0));
        agg.fold_event(&event("PAK", 0, 6.5, 7.0, 0.5));
        agg.fold_event(&event("RESOURCE", 1, 10.0, 11.0, 1.0));

        let summary = aggregate_run(&reg, &agg.into_frames());
        assert!(summary.unattributed_overhead() < 0.0);
    }
}
