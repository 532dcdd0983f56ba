use crate::error::DecodeError;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Bijection on slot indices, stored as `row -> column`.
///
/// Equivalent to a 0/1 matrix with exactly one `1` per row and column; slot
/// `i` is inactive when it maps to itself.
///
/// Serialises as the bare assignment list; deserialising validates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Permutation {
    assignment: Vec<usize>,
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = DecodeError;

    fn try_from(assignment: Vec<usize>) -> Result<Self, Self::Error> {
        Self::from_assignment(assignment)
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(perm: Permutation) -> Self {
        perm.assignment
    }
}

impl Permutation {
    pub fn identity(n: usize) -> Self {
        Self {
            assignment: (0..n).collect(),
        }
    }

    pub(crate) fn from_assignment_unchecked(assignment: Vec<usize>) -> Self {
        Self { assignment }
    }

    /// Build from a `row -> column` map, rejecting anything but a bijection.
    pub fn from_assignment(assignment: Vec<usize>) -> Result<Self, DecodeError> {
        let n = assignment.len();
        let mut seen = vec![false; n];
        for (row, &col) in assignment.iter().enumerate() {
            if col >= n {
                return Err(DecodeError::InvalidPermutation(format!(
                    "row {row} maps to column {col} outside 0..{n}"
                )));
            }
            if std::mem::replace(&mut seen[col], true) {
                return Err(DecodeError::InvalidPermutation(format!(
                    "column {col} is assigned twice"
                )));
            }
        }
        Ok(Self { assignment })
    }

    /// Read a dense 0/1 matrix back into a permutation.
    pub fn from_matrix(matrix: &DMatrix<f32>) -> Result<Self, DecodeError> {
        let (rows, cols) = matrix.shape();
        if rows != cols {
            return Err(DecodeError::NotSquare { rows, cols });
        }
        let mut assignment = Vec::with_capacity(rows);
        for (i, row) in matrix.row_iter().enumerate() {
            let mut col = None;
            for (j, &v) in row.iter().enumerate() {
                if v == 1.0 {
                    if col.is_some() {
                        return Err(DecodeError::InvalidPermutation(format!(
                            "row {i} holds more than one 1"
                        )));
                    }
                    col = Some(j);
                } else if v != 0.0 {
                    return Err(DecodeError::InvalidPermutation(format!(
                        "entry ({i}, {j}) is {v}, expected 0 or 1"
                    )));
                }
            }
            let col = col.ok_or_else(|| {
                DecodeError::InvalidPermutation(format!("row {i} holds no 1"))
            })?;
            assignment.push(col);
        }
        Self::from_assignment(assignment)
    }

    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }

    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    pub fn successor(&self, slot: usize) -> Option<usize> {
        self.assignment.get(slot).copied()
    }

    pub fn is_self_loop(&self, slot: usize) -> bool {
        self.successor(slot) == Some(slot)
    }

    /// Slots that do not map to themselves.
    pub fn active_count(&self) -> usize {
        (0..self.len()).filter(|&i| !self.is_self_loop(i)).count()
    }

    /// Sum of `score[i][σ(i)]`.
    pub fn total_score(&self, score: &DMatrix<f32>) -> f64 {
        self.assignment
            .iter()
            .enumerate()
            .map(|(i, &j)| score[(i, j)] as f64)
            .sum()
    }

    /// Dense 0/1 form.
    pub fn to_matrix(&self) -> DMatrix<f32> {
        let n = self.len();
        let mut m = DMatrix::zeros(n, n);
        for (i, &j) in self.assignment.iter().enumerate() {
            m[(i, j)] = 1.0;
        }
        m
    }
}
