//! Batch orchestration of the decode-and-assemble stages.
//!
//! Stages
//! - generation (optional): the [`DecoderDriver`] runs an external predictor;
//! - assignment: per-sample Hungarian solve of the score matrices (skipped
//!   when the generation already carries permutations);
//! - postprocess: EOS parity check and token decoding;
//! - assembly: permutation → rings → resolved, formatted polygons.
//!
//! Samples are independent; assignment and assembly fan out with rayon.

mod dump;
pub mod params;
mod report;

pub use dump::{ModelOutputDump, RecordedSample};
pub use params::{AssemblyParams, PipelineParams};
pub use report::{PipelineReport, PipelineSummary, SamplePolygons};

use crate::assignment::{self, Permutation};
use crate::decoder::{DecoderDriver, Generation, Predictor};
use crate::diagnostics::TimingBreakdown;
use crate::error::DecodeError;
use crate::polygon::{assemble_permutation, resolve_ring};
use crate::postprocess::{self, DecodedSample};
use crate::tokenizer::Tokenizer;
use crate::types::Token;
use log::debug;
use rand::Rng;
use rayon::prelude::*;

/// Decode-and-assemble pipeline bound to one vocabulary.
#[derive(Clone, Debug)]
pub struct PolygonPipeline {
    tokenizer: Tokenizer,
    params: PipelineParams,
}

impl PolygonPipeline {
    pub fn new(params: PipelineParams) -> Result<Self, DecodeError> {
        let tokenizer = Tokenizer::new(params.tokenizer.clone())?;
        params.assembly.format.validate()?;
        Ok(Self { tokenizer, params })
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    pub fn driver(&self) -> DecoderDriver {
        DecoderDriver::new(self.tokenizer.clone(), self.params.decoder.clone())
    }

    /// Run the predictor and assemble polygons for the whole batch.
    pub fn generate<P, R>(
        &self,
        predictor: &P,
        context: &P::Context,
        batch_size: usize,
        rng: &mut R,
    ) -> Result<PipelineReport, DecodeError>
    where
        P: Predictor + ?Sized,
        R: Rng + ?Sized,
    {
        let generation = self.driver().generate(predictor, context, batch_size, rng)?;
        let mut timing = TimingBreakdown::default();
        timing.push("generate", generation.elapsed_ms);
        self.finish(
            &generation.sequences,
            &generation.confidences,
            &generation.permutations,
            timing,
        )
    }

    /// Assemble an existing generation result.
    pub fn assemble_generation(&self, generation: &Generation) -> Result<PipelineReport, DecodeError> {
        self.finish(
            &generation.sequences,
            &generation.confidences,
            &generation.permutations,
            TimingBreakdown::default(),
        )
    }

    /// Solve and assemble recorded model outputs.
    pub fn run_recorded(&self, dump: &ModelOutputDump) -> Result<PipelineReport, DecodeError> {
        let mut timing = TimingBreakdown::default();
        let scores = dump.score_matrices()?;
        let permutations = timing.time("assignment", || assignment::solve_batch(&scores))?;
        self.finish(&dump.sequences(), &dump.confidences(), &permutations, timing)
    }

    fn finish(
        &self,
        sequences: &[impl AsRef<[Token]>],
        confidences: &[Vec<f32>],
        permutations: &[Permutation],
        mut timing: TimingBreakdown,
    ) -> Result<PipelineReport, DecodeError> {
        if permutations.len() != sequences.len() {
            return Err(DecodeError::ShapeMismatch {
                what: "permutation batch",
                expected: sequences.len(),
                actual: permutations.len(),
            });
        }
        let decoded = timing.time("postprocess", || {
            postprocess::postprocess(sequences, confidences, &self.tokenizer)
        })?;
        let samples: Vec<SamplePolygons> = timing.time("assembly", || {
            decoded
                .into_par_iter()
                .zip(permutations.par_iter())
                .map(|(decoded, perm)| self.assemble_sample(decoded, perm))
                .collect()
        });
        let summary = PipelineSummary::from_samples(&samples);
        debug!(
            "PolygonPipeline: samples={} valid={} rings={} degenerate={} polygons={} total_ms={:.3}",
            summary.samples,
            summary.valid_samples,
            summary.rings,
            summary.degenerate_rings,
            summary.polygons,
            timing.total_ms
        );
        Ok(PipelineReport {
            summary,
            timing,
            samples,
        })
    }

    fn assemble_sample(&self, decoded: DecodedSample, perm: &Permutation) -> SamplePolygons {
        let rings = assemble_permutation(perm);
        let coords = decoded.padded_coords(perm.len());
        let format = self.params.assembly.format;
        let polygons = rings
            .iter()
            .map(|ring| resolve_ring(ring, &coords))
            .filter(|ring| !ring.is_empty())
            .map(|ring| format.apply(&ring))
            .collect();
        SamplePolygons {
            decoded,
            rings,
            polygons,
        }
    }
}
