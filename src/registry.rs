//! Stage registry: the ordered catalog of pipeline stages.
//!
//! The encoder pipeline processes every frame through a fixed sequence of
//! stages (resource acquisition, picture analysis, motion estimation, ...,
//! entropy coding, packetization). The registry maps stage names from trace
//! records to a canonical index and back, and defines the named inter-stage
//! hand-offs used as scheduling-overhead proxies.
//!
//! The registry is an immutable value built once at startup and passed
//! explicitly to everything that needs stage lookup.

use crate::utils::config::{STAGE_FULL_NAMES, STAGE_LABELS};

/// Named inter-stage hand-offs tracked as scheduling-overhead proxies.
///
/// Each gap measures the idle span between one specific stage finishing and
/// another starting. The pairs encode known pipeline hand-offs; they are not
/// derived generically from registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedGap {
    /// Picture analysis end to picture decision start
    Pd,
    /// Source-based operations end to picture manager start
    Pm,
    /// Entropy coding end to packetization start
    Pak,
}

impl NamedGap {
    /// Short label used in report columns
    pub fn label(self) -> &'static str {
        match self {
            NamedGap::Pd => "pd_s",
            NamedGap::Pm => "pm_s",
            NamedGap::Pak => "pak_s",
        }
    }
}

/// Endpoints of an inter-stage gap, as registry indices
#[derive(Debug, Clone, Copy)]
pub struct GapEndpoints {
    /// Stage whose end time opens the gap
    pub predecessor: usize,
    /// Stage whose start time closes the gap
    pub successor: usize,
}

/// Fixed, ordered catalog of pipeline stage names
///
/// **Public** - constructed once in main/commands, shared by reference
#[derive(Debug, Clone)]
pub struct StageRegistry {
    full_names: &'static [&'static str],
    labels: &'static [&'static str],
    pd_gap: GapEndpoints,
    pm_gap: GapEndpoints,
    pak_gap: GapEndpoints,
    /// Index whose generic predecessor gap is reported as a diagnostic column
    diagnostic_gap_stage: usize,
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::encoder_pipeline()
    }
}

impl StageRegistry {
    /// Build the registry for the 12-stage encoder pipeline
    ///
    /// **Public** - the only catalog currently shipped
    pub fn encoder_pipeline() -> Self {
        debug_assert_eq!(STAGE_FULL_NAMES.len(), STAGE_LABELS.len());

        // Gap endpoints are resolved by name so the hand-off pairs stay
        // readable; the catalog is a compile-time constant so the lookups
        // cannot fail.
        let find = |name: &str| {
            STAGE_FULL_NAMES
                .iter()
                .position(|n| *n == name)
                .unwrap_or_else(|| unreachable!("stage {name} missing from catalog"))
        };

        Self {
            full_names: STAGE_FULL_NAMES,
            labels: STAGE_LABELS,
            pd_gap: GapEndpoints {
                predecessor: find("PA"),
                successor: find("PD"),
            },
            pm_gap: GapEndpoints {
                predecessor: find("SRC"),
                successor: find("PM"),
            },
            pak_gap: GapEndpoints {
                predecessor: find("ENTROPY"),
                successor: find("PAK"),
            },
            diagnostic_gap_stage: find("IRC"),
        }
    }

    /// Number of stages in the catalog
    pub fn len(&self) -> usize {
        self.full_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.full_names.is_empty()
    }

    /// Resolve a stage name from a trace record to its canonical index
    ///
    /// Returns `None` for names absent from the catalog. Callers must treat
    /// that as "ignore the event": trace producers may emit informational
    /// stages that are not tracked for metrics.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.full_names.iter().position(|n| *n == name)
    }

    /// Canonical full name of the stage at `index`
    pub fn full_name(&self, index: usize) -> &'static str {
        self.full_names[index]
    }

    /// Short report label of the stage at `index`
    pub fn label(&self, index: usize) -> &'static str {
        self.labels[index]
    }

    /// Endpoints of a named inter-stage gap
    pub fn gap_endpoints(&self, gap: NamedGap) -> GapEndpoints {
        match gap {
            NamedGap::Pd => self.pd_gap,
            NamedGap::Pm => self.pm_gap,
            NamedGap::Pak => self.pak_gap,
        }
    }

    /// Stage whose generic predecessor gap is reported as a diagnostic
    /// column in the latency table
    pub fn diagnostic_gap_stage(&self) -> usize {
        self.diagnostic_gap_stage
    }
}
