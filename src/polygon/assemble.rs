use super::merge::merge_chains;
use crate::assignment::Permutation;
use crate::error::DecodeError;
use crate::sampling::argmax;
use crate::types::{Ring, Vertex};
use nalgebra::DMatrix;

/// Slots without a self-loop, in index order.
pub fn active_slots(perm: &DMatrix<f32>) -> Vec<usize> {
    let n = perm.nrows().min(perm.ncols());
    (0..n).filter(|&i| perm[(i, i)] != 1.0).collect()
}

/// Active rows × active columns of `perm`.
pub fn restrict(perm: &DMatrix<f32>, active: &[usize]) -> DMatrix<f32> {
    perm.select_rows(active.iter()).select_columns(active.iter())
}

/// One `[row, argmax(row)]` chain per row of the restricted matrix.
pub fn successor_chains(restricted: &DMatrix<f32>) -> Vec<Vec<usize>> {
    if restricted.ncols() == 0 {
        return Vec::new();
    }
    restricted
        .row_iter()
        .enumerate()
        .map(|(i, row)| {
            let values: Vec<f32> = row.iter().copied().collect();
            vec![i, argmax(&values)]
        })
        .collect()
}

/// Decompose a square 0/1 permutation matrix into rings of slot indices.
pub fn assemble(perm: &DMatrix<f32>) -> Result<Vec<Ring>, DecodeError> {
    let (rows, cols) = perm.shape();
    if rows != cols {
        return Err(DecodeError::NotSquare { rows, cols });
    }
    let active = active_slots(perm);
    if active.is_empty() {
        return Ok(Vec::new());
    }
    let restricted = restrict(perm, &active);
    let chains = merge_chains(successor_chains(&restricted));
    Ok(chains
        .into_iter()
        .map(|mut chain| {
            if chain.len() > 1 && chain.first() == chain.last() {
                chain.pop();
            }
            chain.into_iter().map(|local| active[local]).collect()
        })
        .collect())
}

/// [`assemble`] on the dense form of a solved permutation.
pub fn assemble_permutation(perm: &Permutation) -> Vec<Ring> {
    // A permutation's dense form is always square.
    assemble(&perm.to_matrix()).unwrap_or_default()
}

/// Look up ring slots in `coords`; slots without a coordinate are dropped.
pub fn resolve_ring(ring: &[usize], coords: &[Option<Vertex>]) -> Vec<Vertex> {
    ring.iter()
        .filter_map(|&slot| coords.get(slot).copied().flatten())
        .collect()
}
