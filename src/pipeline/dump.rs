use crate::error::DecodeError;
use crate::types::Token;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Raw model outputs recorded for offline assembly.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModelOutputDump {
    pub samples: Vec<RecordedSample>,
}

/// One sample's generated tokens, per-vertex confidences and score rows.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecordedSample {
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub confidences: Vec<f32>,
    /// Score matrix as a list of rows.
    pub scores: Vec<Vec<f32>>,
}

impl RecordedSample {
    /// Dense score matrix; ragged rows are a shape error. Squareness is left
    /// to the assignment solver.
    pub fn score_matrix(&self) -> Result<DMatrix<f32>, DecodeError> {
        let rows = self.scores.len();
        let cols = self.scores.first().map_or(0, Vec::len);
        if let Some(bad) = self.scores.iter().find(|r| r.len() != cols) {
            return Err(DecodeError::ShapeMismatch {
                what: "score row length",
                expected: cols,
                actual: bad.len(),
            });
        }
        Ok(DMatrix::from_fn(rows, cols, |i, j| self.scores[i][j]))
    }
}

impl ModelOutputDump {
    pub fn score_matrices(&self) -> Result<Vec<DMatrix<f32>>, DecodeError> {
        self.samples.iter().map(RecordedSample::score_matrix).collect()
    }

    pub fn sequences(&self) -> Vec<&[Token]> {
        self.samples.iter().map(|s| s.tokens.as_slice()).collect()
    }

    pub fn confidences(&self) -> Vec<Vec<f32>> {
        self.samples.iter().map(|s| s.confidences.clone()).collect()
    }
}
