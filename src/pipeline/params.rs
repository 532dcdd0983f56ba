//! Parameter types configuring the decode-and-assemble pipeline.

use crate::decoder::DecoderParams;
use crate::polygon::RingFormat;
use crate::tokenizer::TokenizerParams;
use serde::{Deserialize, Serialize};

/// Pipeline-wide parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    /// Vocabulary and slot capacity.
    pub tokenizer: TokenizerParams,
    /// Sampling policy and step count of the autoregressive driver.
    pub decoder: DecoderParams,
    /// Ring assembly and output convention.
    pub assembly: AssemblyParams,
}

/// Polygon assembly options.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyParams {
    /// Coordinate convention of the emitted polygons.
    pub format: RingFormat,
}
