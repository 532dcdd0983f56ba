#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod assignment;
pub mod decoder;
pub mod error;
pub mod pipeline;
pub mod polygon;
pub mod postprocess;
pub mod tokenizer;
pub mod types;

// Supporting modules for tools, demos and tests.
pub mod config;
pub mod diagnostics;
pub mod io;
pub mod sampling;
pub mod synthetic;

// --- High-level re-exports -------------------------------------------------

// Main entry points: pipeline + results.
pub use crate::pipeline::{PipelineParams, PipelineReport, PolygonPipeline};

// Stage-level building blocks.
pub use crate::assignment::{solve, solve_batch, Permutation};
pub use crate::decoder::{DecoderDriver, DecoderParams, Generation, Predictor, ScoreProjections};
pub use crate::polygon::{assemble, FormattedRing, RingFormat};
pub use crate::postprocess::{postprocess, DecodedSample};
pub use crate::sampling::SamplingPolicy;
pub use crate::tokenizer::{Tokenizer, TokenizerParams};

pub use crate::error::DecodeError;
pub use crate::types::{Ring, Sequence, Token, Vertex};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use poly_decoder::prelude::*;
/// use poly_decoder::synthetic::{ScriptedPredictor, ScriptedSample};
///
/// # fn main() -> Result<(), DecodeError> {
/// let pipeline = PolygonPipeline::new(PipelineParams::default())?;
/// let square = ScriptedSample {
///     vertices: vec![
///         Vertex::new(10.0, 10.0),
///         Vertex::new(10.0, 50.0),
///         Vertex::new(50.0, 50.0),
///         Vertex::new(50.0, 10.0),
///     ],
///     successors: vec![1, 2, 3, 0],
/// };
/// let predictor = ScriptedPredictor::new(pipeline.tokenizer(), &[square])?;
/// let mut rng = pipeline.driver().seeded_rng();
/// let report = pipeline.generate(&predictor, &(), 1, &mut rng)?;
/// println!("rings={:?}", report.samples[0].rings);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::{DecodeError, PipelineParams, PipelineReport, PolygonPipeline, Vertex};
}
