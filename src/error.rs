use thiserror::Error;

/// Errors raised by the decoding core.
///
/// Malformed generated sequences and score matrices without active slots are
/// not errors; they surface as `None` coordinates or empty ring lists.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("score matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("score matrix holds a non-finite value at ({row}, {col})")]
    NonFiniteScore { row: usize, col: usize },

    #[error("shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{count} vertices exceed the configured maximum of {max}")]
    TooManyVertices { count: usize, max: usize },

    #[error("sequence capacity {capacity} cannot hold {required} tokens")]
    CapacityTooSmall { capacity: usize, required: usize },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("matrix is not a 0/1 permutation: {0}")]
    InvalidPermutation(String),

    #[error("predictor failed: {0}")]
    Predictor(String),
}
