//! Coordinate tokenizer mapping pixel coordinates onto a bounded vocabulary.
//!
//! Layout
//! - Tokens `[0, num_bins)` are coordinate bins shared by the row and column
//!   axes. A coordinate `c` lands in bin `⌊c / (image_size / num_bins)⌋`,
//!   clamped into range.
//! - Three control codes follow the bins: `BOS = num_bins`,
//!   `EOS = num_bins + 1`, `PAD = num_bins + 2`.
//! - A sequence is `BOS, r0, c0, r1, c1, …, EOS, PAD…`, so a well-formed
//!   `EOS` always sits at an odd index.
//!
//! Dequantisation uses the bin origin (`bin * bin_width`), so a round trip
//! never moves a coordinate by more than one bin width and always rounds
//! towards the origin.

mod params;

pub use params::TokenizerParams;

use crate::error::DecodeError;
use crate::types::{Sequence, Token, Vertex};

/// Bidirectional coordinate ⇄ token mapping with a fixed vocabulary.
#[derive(Clone, Debug)]
pub struct Tokenizer {
    params: TokenizerParams,
    bin_width: f32,
    bos: Token,
    eos: Token,
    pad: Token,
}

impl Tokenizer {
    /// Build a tokenizer, validating the vocabulary configuration.
    pub fn new(params: TokenizerParams) -> Result<Self, DecodeError> {
        params.validate()?;
        let bins = params.num_bins as Token;
        Ok(Self {
            bin_width: params.image_size / params.num_bins as f32,
            bos: bins,
            eos: bins + 1,
            pad: bins + 2,
            params,
        })
    }

    pub fn params(&self) -> &TokenizerParams {
        &self.params
    }

    pub fn num_bins(&self) -> usize {
        self.params.num_bins
    }

    /// Maximum number of vertices per image (`N`).
    pub fn n_vertices(&self) -> usize {
        self.params.n_vertices
    }

    pub fn bin_width(&self) -> f32 {
        self.bin_width
    }

    pub fn bos(&self) -> Token {
        self.bos
    }

    pub fn eos(&self) -> Token {
        self.eos
    }

    pub fn pad(&self) -> Token {
        self.pad
    }

    /// Bins plus the three control codes.
    pub fn vocab_size(&self) -> usize {
        self.params.num_bins + 3
    }

    /// Full sequence capacity `2N + 2`.
    pub fn max_len(&self) -> usize {
        2 * self.params.n_vertices + 2
    }

    /// Number of tokens generated after `BOS` to fill `max_len`.
    pub fn generation_steps(&self) -> usize {
        2 * self.params.n_vertices + 1
    }

    /// True for coordinate bins, false for control codes and out-of-range ids.
    pub fn is_coordinate(&self, token: Token) -> bool {
        (token as usize) < self.params.num_bins
    }

    pub fn quantize(&self, coord: f32) -> Token {
        let max_bin = (self.params.num_bins - 1) as f32;
        let bin = (coord / self.bin_width).floor();
        // NaN clamps to NaN and casts to 0.
        bin.clamp(0.0, max_bin) as Token
    }

    pub fn dequantize(&self, token: Token) -> f32 {
        token as f32 * self.bin_width
    }

    /// Encode vertices into a `capacity`-long sequence padded with `PAD`.
    pub fn encode(&self, vertices: &[Vertex], capacity: usize) -> Result<Sequence, DecodeError> {
        if vertices.len() > self.params.n_vertices {
            return Err(DecodeError::TooManyVertices {
                count: vertices.len(),
                max: self.params.n_vertices,
            });
        }
        let required = 2 * vertices.len() + 2;
        if capacity < required {
            return Err(DecodeError::CapacityTooSmall { capacity, required });
        }
        let mut seq = Vec::with_capacity(capacity);
        seq.push(self.bos);
        for v in vertices {
            seq.push(self.quantize(v.row));
            seq.push(self.quantize(v.col));
        }
        seq.push(self.eos);
        seq.resize(capacity, self.pad);
        Ok(seq)
    }

    /// Decode row/col pairs starting at index 1.
    ///
    /// Stops at the first `EOS`, at any other control token, at an incomplete
    /// trailing pair, or at the end of the sequence.
    pub fn decode(&self, sequence: &[Token]) -> Vec<Vertex> {
        let body = sequence.get(1..).unwrap_or(&[]);
        let mut vertices = Vec::with_capacity(body.len() / 2);
        for pair in body.chunks_exact(2) {
            let (r, c) = (pair[0], pair[1]);
            if !self.is_coordinate(r) || !self.is_coordinate(c) {
                break;
            }
            vertices.push(Vertex::new(self.dequantize(r), self.dequantize(c)));
        }
        vertices
    }
}
