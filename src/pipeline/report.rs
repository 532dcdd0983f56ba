use crate::diagnostics::TimingBreakdown;
use crate::polygon::FormattedRing;
use crate::postprocess::DecodedSample;
use crate::types::Ring;
use serde::Serialize;

/// Assembled output of one sample.
#[derive(Clone, Debug, Serialize)]
pub struct SamplePolygons {
    /// Decoded vertices and confidences; `None` for rejected sequences.
    pub decoded: DecodedSample,
    /// Rings as slot indices, in discovery order.
    pub rings: Vec<Ring>,
    /// Rings resolved to coordinates in the configured format. Slots without
    /// a decoded vertex are dropped, and rings left empty are omitted.
    pub polygons: Vec<FormattedRing>,
}

impl SamplePolygons {
    /// Rings with fewer than three slots.
    pub fn degenerate_rings(&self) -> usize {
        self.rings.iter().filter(|r| r.len() < 3).count()
    }
}

/// Aggregate counters over a batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary {
    pub samples: usize,
    pub valid_samples: usize,
    pub rings: usize,
    pub degenerate_rings: usize,
    pub polygons: usize,
}

impl PipelineSummary {
    pub fn from_samples(samples: &[SamplePolygons]) -> Self {
        Self {
            samples: samples.len(),
            valid_samples: samples.iter().filter(|s| s.decoded.is_valid()).count(),
            rings: samples.iter().map(|s| s.rings.len()).sum(),
            degenerate_rings: samples.iter().map(SamplePolygons::degenerate_rings).sum(),
            polygons: samples.iter().map(|s| s.polygons.len()).sum(),
        }
    }
}

/// Result of a pipeline run.
#[derive(Clone, Debug, Serialize)]
pub struct PipelineReport {
    pub summary: PipelineSummary,
    pub timing: TimingBreakdown,
    pub samples: Vec<SamplePolygons>,
}
