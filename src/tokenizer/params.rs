use crate::error::DecodeError;
use serde::{Deserialize, Serialize};

/// Vocabulary configuration shared by the encoder and decoder sides.
///
/// - `num_bins`: coordinate bins per axis.
/// - `image_size`: side length in pixels of the (square) model input.
/// - `n_vertices`: maximum vertices per image; fixes the sequence capacity
///   and the size of the permutation matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerParams {
    pub num_bins: usize,
    pub image_size: f32,
    pub n_vertices: usize,
}

impl Default for TokenizerParams {
    fn default() -> Self {
        Self {
            num_bins: 224,
            image_size: 224.0,
            n_vertices: 192,
        }
    }
}

impl TokenizerParams {
    pub fn validate(&self) -> Result<(), DecodeError> {
        if self.num_bins == 0 {
            return Err(DecodeError::InvalidParams("num_bins must be positive".into()));
        }
        if !(self.image_size.is_finite() && self.image_size > 0.0) {
            return Err(DecodeError::InvalidParams(format!(
                "image_size must be positive, got {}",
                self.image_size
            )));
        }
        if self.n_vertices == 0 {
            return Err(DecodeError::InvalidParams("n_vertices must be positive".into()));
        }
        Ok(())
    }
}
