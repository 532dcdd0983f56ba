//! Output coordinate conventions for assembled rings.
//!
//! Each convention is a pure per-vertex transform; none of them changes ring
//! membership or vertex order.

use crate::error::DecodeError;
use crate::types::Vertex;
use serde::{Deserialize, Serialize};

/// Coordinate convention applied to every vertex of every ring.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RingFormat {
    /// `[row, col]` as decoded.
    Raw,
    /// `[col, row]`, i.e. `[x, y]`.
    Swapped,
    /// `[col * s, -row * s]` with `s = target_size / source_size`: a
    /// different canvas with the vertical axis pointing up.
    Rescaled { source_size: f32, target_size: f32 },
    /// `[col0, row0, col1, row1, …]` as used by COCO segmentation lists.
    Flattened,
}

impl Default for RingFormat {
    fn default() -> Self {
        RingFormat::Raw
    }
}

/// A ring expressed in one [`RingFormat`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormattedRing {
    Points(Vec<[f32; 2]>),
    Flat(Vec<f32>),
}

impl FormattedRing {
    /// Number of vertices represented.
    pub fn vertex_count(&self) -> usize {
        match self {
            FormattedRing::Points(p) => p.len(),
            FormattedRing::Flat(f) => f.len() / 2,
        }
    }
}

impl RingFormat {
    /// `Rescaled` needs finite sizes and a positive `source_size`.
    pub fn validate(&self) -> Result<(), DecodeError> {
        if let RingFormat::Rescaled {
            source_size,
            target_size,
        } = *self
        {
            if !(source_size.is_finite() && source_size > 0.0) {
                return Err(DecodeError::InvalidParams(format!(
                    "rescaled source_size must be positive, got {source_size}"
                )));
            }
            if !target_size.is_finite() {
                return Err(DecodeError::InvalidParams(format!(
                    "rescaled target_size must be finite, got {target_size}"
                )));
            }
        }
        Ok(())
    }

    pub fn apply(&self, ring: &[Vertex]) -> FormattedRing {
        match *self {
            RingFormat::Raw => FormattedRing::Points(ring.iter().map(|v| [v.row, v.col]).collect()),
            RingFormat::Swapped => {
                FormattedRing::Points(ring.iter().map(|v| [v.col, v.row]).collect())
            }
            RingFormat::Rescaled {
                source_size,
                target_size,
            } => {
                let s = target_size / source_size;
                FormattedRing::Points(ring.iter().map(|v| [v.col * s, -v.row * s]).collect())
            }
            RingFormat::Flattened => {
                FormattedRing::Flat(ring.iter().flat_map(|v| [v.col, v.row]).collect())
            }
        }
    }
}
