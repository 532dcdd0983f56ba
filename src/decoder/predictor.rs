use crate::error::DecodeError;
use crate::types::Sequence;
use nalgebra::{DMatrix, DVector};

/// Output of one predictor step for the whole batch.
#[derive(Clone, Debug, Default)]
pub struct StepOutput {
    /// Next-token logits per sample, each of length `vocab_size`.
    pub logits: Vec<Vec<f32>>,
    /// Opaque per-sample feature vector consumed by the score projections.
    pub features: Vec<Vec<f32>>,
}

/// The two learned score projections of one sample.
#[derive(Clone, Debug)]
pub enum ScoreProjections {
    /// Per-slot vectors combined as `score[i][j] = a[i] + b[j]`.
    Slots(DVector<f32>, DVector<f32>),
    /// Pairwise maps combined as `score[i][j] = a[i][j] + b[j][i]`.
    Pairwise(DMatrix<f32>, DMatrix<f32>),
}

impl ScoreProjections {
    /// Combine into an `n×n` score matrix, checking both projection shapes.
    pub fn combine(&self, n: usize) -> Result<DMatrix<f32>, DecodeError> {
        match self {
            ScoreProjections::Slots(a, b) => {
                check_len("score projection a", n, a.len())?;
                check_len("score projection b", n, b.len())?;
                Ok(DMatrix::from_fn(n, n, |i, j| a[i] + b[j]))
            }
            ScoreProjections::Pairwise(a, b) => {
                check_square("score projection a", n, a)?;
                check_square("score projection b", n, b)?;
                Ok(a + b.transpose())
            }
        }
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), DecodeError> {
    if expected != actual {
        return Err(DecodeError::ShapeMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_square(what: &'static str, n: usize, m: &DMatrix<f32>) -> Result<(), DecodeError> {
    check_len(what, n, m.nrows())?;
    check_len(what, n, m.ncols())
}

/// Capability interface to the external sequence model.
///
/// The driver only borrows the predictor; implementations own whatever
/// device, batching or distribution wrapping they need.
pub trait Predictor {
    /// Encoded image context shared by all steps of a run.
    type Context: ?Sized;

    /// Next-token logits and features for every prefix in the batch.
    fn predict(&self, context: &Self::Context, prefixes: &[Sequence])
        -> Result<StepOutput, DecodeError>;

    /// Map one sample's final feature vector to its score projections.
    fn score_projections(&self, feature: &[f32]) -> Result<ScoreProjections, DecodeError>;
}
