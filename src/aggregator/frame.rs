//! Per-frame event aggregation.
//!
//! Each frame owns one accumulator per pipeline stage. Events fold in with
//! first-write-wins start, max-wins end, summed CPU duration, plus two
//! stage-specific rules:
//! - ENTROPY/ENCDEC sub-events tagged with the duplicate `outType` are
//!   dropped entirely (their work is already counted by a companion
//!   sub-event of the same stage);
//! - ME only latches its start time from the segment-0 sub-event, because
//!   segments complete out of temporal order.

use crate::parser::TraceEvent;
use crate::registry::{NamedGap, StageRegistry};
use crate::utils::config::DUPLICATE_SUB_EVENT_OUT_TYPE;
use log::{debug, warn};

/// Timing accumulator for one (frame, stage) pair
///
/// Stages that never receive an event read back as 0.0 start/end and 0.0
/// CPU; derived latencies involving them are degenerate by design.
#[derive(Debug, Clone, Default)]
pub struct StageAccumulator {
    first_start: Option<f64>,
    last_end: f64,
    cpu_time: f64,
}

impl StageAccumulator {
    /// Fold one event: latch start, extend end, accumulate CPU
    fn fold(&mut self, event: &TraceEvent) {
        self.latch_start(event.start_time);
        self.observe_end(event.end_time);
        self.cpu_time += event.duration;
    }

    /// First-write-wins: only the first value ever offered is kept
    fn latch_start(&mut self, start_time: f64) {
        if self.first_start.is_none() {
            self.first_start = Some(start_time);
        }
    }

    /// Max-wins: the retained end time never decreases
    fn observe_end(&mut self, end_time: f64) {
        if end_time > self.last_end {
            self.last_end = end_time;
        }
    }

    /// Start timestamp of the first folded event (0.0 if none)
    pub fn start_time(&self) -> f64 {
        self.first_start.unwrap_or(0.0)
    }

    /// Maximum end timestamp across folded events (0.0 if none)
    pub fn end_time(&self) -> f64 {
        self.last_end
    }

    /// Accumulated CPU-busy time across folded events
    pub fn cpu_time(&self) -> f64 {
        self.cpu_time
    }

    /// Wall-clock span of the stage within its frame
    pub fn latency(&self) -> f64 {
        self.last_end - self.start_time()
    }
}

/// All stage accumulators for one frame
#[derive(Debug, Clone)]
pub struct FrameRecord {
    poc: usize,
    stages: Vec<StageAccumulator>,
}

impl FrameRecord {
    fn new(poc: usize, stage_count: usize) -> Self {
        Self {
            poc,
            stages: vec![StageAccumulator::default(); stage_count],
        }
    }

    /// Picture order count of this frame
    pub fn poc(&self) -> usize {
        self.poc
    }

    /// Accumulator of the stage at `index`
    pub fn stage(&self, index: usize) -> &StageAccumulator {
        &self.stages[index]
    }

    /// End-to-end latency: last stage's end minus first stage's start
    pub fn frame_latency(&self, registry: &StageRegistry) -> f64 {
        self.stages[registry.len() - 1].end_time() - self.stages[0].start_time()
    }

    /// Total CPU time across all stages of the frame
    pub fn frame_cpu_time(&self) -> f64 {
        self.stages.iter().map(StageAccumulator::cpu_time).sum()
    }

    /// Wall-clock latency of one stage
    pub fn stage_latency(&self, index: usize) -> f64 {
        self.stages[index].latency()
    }

    /// Accumulated CPU time of one stage
    pub fn stage_cpu_time(&self, index: usize) -> f64 {
        self.stages[index].cpu_time()
    }

    /// Idle span of a named pipeline hand-off: successor start minus
    /// predecessor end, per the registry's gap table
    pub fn named_gap(&self, registry: &StageRegistry, gap: NamedGap) -> f64 {
        let endpoints = registry.gap_endpoints(gap);
        self.stages[endpoints.successor].start_time() - self.stages[endpoints.predecessor].end_time()
    }

    /// Generic gap between a stage and its registry predecessor
    ///
    /// Defined for `index >= 1`; diagnostic-only reporting.
    pub fn stage_gap(&self, index: usize) -> f64 {
        debug_assert!(index >= 1, "stage_gap needs a predecessor");
        self.stages[index].start_time() - self.stages[index - 1].end_time()
    }
}

/// Routes events to frame/stage accumulators and applies the fold rules
///
/// **Public** - owns all FrameRecords during the fold phase; frames become
/// read-only once taken with [`FrameAggregator::into_frames`]
#[derive(Debug)]
pub struct FrameAggregator<'a> {
    registry: &'a StageRegistry,
    frames: Vec<FrameRecord>,
    me_stage: Option<usize>,
    encdec_stage: Option<usize>,
    entropy_stage: Option<usize>,
}

impl<'a> FrameAggregator<'a> {
    /// Create one FrameRecord slot per expected frame index
    ///
    /// # Arguments
    /// * `registry` - stage catalog used for routing and fold rules
    /// * `frame_count` - total number of frames in the trace, known upfront
    pub fn new(registry: &'a StageRegistry, frame_count: usize) -> Self {
        Self {
            registry,
            frames: (0..frame_count)
                .map(|poc| FrameRecord::new(poc, registry.len()))
                .collect(),
            me_stage: registry.index_of("ME"),
            encdec_stage: registry.index_of("ENCDEC"),
            entropy_stage: registry.index_of("ENTROPY"),
        }
    }

    /// Fold one event into its (frame, stage) accumulator
    ///
    /// **Public** - main entry point of the fold phase
    ///
    /// Events with an unknown stage name are ignored (trace producers may
    /// emit informational stages not tracked for metrics). Events whose
    /// frame index is outside the expected range are ignored with a warning.
    pub fn fold_event(&mut self, event: &TraceEvent) {
        let Some(stage) = self.registry.index_of(&event.stage) else {
            debug!("Ignoring event from untracked stage '{}'", event.stage);
            return;
        };

        // Skip sub-events that would double-count work already folded from
        // a companion sub-event of the same stage. Only ENTROPY and ENCDEC
        // emit these.
        if (Some(stage) == self.entropy_stage || Some(stage) == self.encdec_stage)
            && event.out_type == DUPLICATE_SUB_EVENT_OUT_TYPE
        {
            return;
        }

        let frame_count = self.frames.len();
        let Some(frame) = self.frames.get_mut(event.frame_index) else {
            warn!(
                "Ignoring event for frame {} beyond expected count {}",
                event.frame_index, frame_count
            );
            return;
        };

        let accumulator = &mut frame.stages[stage];

        if Some(stage) == self.me_stage {
            // ME segments complete out of temporal order; only the first
            // spatial segment carries the stage's true start time.
            if event.segment_index == 0 {
                accumulator.latch_start(event.start_time);
            }
            accumulator.observe_end(event.end_time);
            accumulator.cpu_time += event.duration;
        } else {
            accumulator.fold(event);
        }
    }

    /// Finalized frames, in POC order
    pub fn into_frames(self) -> Vec<FrameRecord> {
        self.frames
    }
}
