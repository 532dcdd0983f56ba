//! Validation and decoding of raw generated sequences.
//!
//! A sequence is accepted only when its first `EOS` sits at an odd index:
//! `BOS` occupies index 0 and every vertex consumes two slots after it. A
//! missing `EOS` is reported as index 0. Rejected samples yield `None`
//! coordinates and confidences; this is a per-sample outcome, not an error.

use crate::error::DecodeError;
use crate::tokenizer::Tokenizer;
use crate::types::{Token, Vertex};
use log::debug;
use serde::Serialize;

/// Decimal places kept for reported confidences.
pub const CONFIDENCE_DECIMALS: i32 = 3;

/// Decoded vertices and their confidences for one sample.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DecodedSample {
    pub coords: Option<Vec<Vertex>>,
    pub confidences: Option<Vec<f32>>,
}

impl DecodedSample {
    pub fn is_valid(&self) -> bool {
        self.coords.is_some()
    }

    pub fn vertex_count(&self) -> usize {
        self.coords.as_ref().map_or(0, Vec::len)
    }

    /// Coordinates padded with `None` up to `capacity` slots.
    ///
    /// Slot `i` of the permutation matrix refers to the `i`-th decoded
    /// vertex; slots past the decoded count carry no coordinate. Extra
    /// decoded vertices beyond `capacity` are dropped.
    pub fn padded_coords(&self, capacity: usize) -> Vec<Option<Vertex>> {
        let mut padded: Vec<Option<Vertex>> = self
            .coords
            .iter()
            .flatten()
            .take(capacity)
            .copied()
            .map(Some)
            .collect();
        padded.resize(capacity, None);
        padded
    }
}

/// Index of the first `EOS`, or 0 when the sequence has none.
pub fn eos_index(sequence: &[Token], eos: Token) -> usize {
    sequence.iter().position(|&t| t == eos).unwrap_or(0)
}

/// True when `EOS` closes a whole number of row/col pairs.
pub fn is_valid_eos(index: usize) -> bool {
    index != 0 && index % 2 == 1
}

pub fn round_confidence(value: f32) -> f32 {
    let scale = 10f32.powi(CONFIDENCE_DECIMALS);
    (value * scale).round() / scale
}

/// Decode one sample; `confidences` are the per-vertex values captured by the
/// driver.
pub fn postprocess_one(
    sequence: &[Token],
    confidences: &[f32],
    tokenizer: &Tokenizer,
) -> Result<DecodedSample, DecodeError> {
    let eos = eos_index(sequence, tokenizer.eos());
    if !is_valid_eos(eos) {
        return Ok(DecodedSample::default());
    }
    let coords = tokenizer.decode(&sequence[..=eos]);
    if confidences.len() < coords.len() {
        return Err(DecodeError::ShapeMismatch {
            what: "vertex confidences",
            expected: coords.len(),
            actual: confidences.len(),
        });
    }
    let confs = confidences[..coords.len()]
        .iter()
        .map(|&c| round_confidence(c))
        .collect();
    Ok(DecodedSample {
        coords: Some(coords),
        confidences: Some(confs),
    })
}

/// Decode a batch. `confidences[i]` belongs to `sequences[i]`.
pub fn postprocess(
    sequences: &[impl AsRef<[Token]>],
    confidences: &[Vec<f32>],
    tokenizer: &Tokenizer,
) -> Result<Vec<DecodedSample>, DecodeError> {
    if sequences.len() != confidences.len() {
        return Err(DecodeError::ShapeMismatch {
            what: "confidence batch",
            expected: sequences.len(),
            actual: confidences.len(),
        });
    }
    let decoded = sequences
        .iter()
        .zip(confidences)
        .map(|(seq, confs)| postprocess_one(seq.as_ref(), confs, tokenizer))
        .collect::<Result<Vec<_>, _>>()?;
    let invalid = decoded.iter().filter(|d| !d.is_valid()).count();
    if invalid > 0 {
        debug!(
            "postprocess: {}/{} samples rejected by the EOS parity check",
            invalid,
            decoded.len()
        );
    }
    Ok(decoded)
}
