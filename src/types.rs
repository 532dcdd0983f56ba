use serde::{Deserialize, Serialize};

/// Vocabulary entry produced or consumed by the sequence model.
pub type Token = u32;

/// Token sequence: `BOS`, row/col bin pairs, `EOS`, then `PAD`.
pub type Sequence = Vec<Token>;

/// Decoded pixel coordinate in `(row, col)` order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub row: f32,
    pub col: f32,
}

impl Vertex {
    pub fn new(row: f32, col: f32) -> Self {
        Self { row, col }
    }
}

/// Closed ring of slot indices. The closing vertex is not repeated.
pub type Ring = Vec<usize>;
