//! Autoregressive decoding driver.
//!
//! Overview
//! - Every sample starts from the prefix `[BOS]`.
//! - Each step calls the external [`Predictor`] once for the whole batch,
//!   filters and normalises the logits, and appends one token per sample
//!   according to the active [`SamplingPolicy`](crate::sampling::SamplingPolicy).
//! - On even steps (row-bin positions, one per vertex) the top-1 filtered
//!   probability is recorded as that vertex's confidence.
//! - The loop always runs the configured number of steps; there is no early
//!   stop on `EOS`, truncation is left to [`crate::postprocess`].
//! - After the loop the last step's per-sample features go through the
//!   predictor's score projections, yielding an `N×N` score matrix that is
//!   solved per sample by [`crate::assignment`].
//!
//! Modules
//! - [`params`] – sampling knobs and step count.
//! - `predictor` – the capability interface the driver calls.
//! - `driver` – the [`DecoderDriver`] state machine.

mod driver;
pub mod params;
mod predictor;

pub use driver::{DecoderDriver, Generation};
pub use params::DecoderParams;
pub use predictor::{Predictor, ScoreProjections, StepOutput};
