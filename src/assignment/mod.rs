//! Exact maximum-score bipartite assignment.
//!
//! `solve` turns a dense `N×N` score matrix into the bijection `σ` that
//! maximises `Σ_i score[i][σ(i)]`. The implementation is the
//! shortest-augmenting-path form of the Hungarian method (Kuhn–Munkres with
//! Jonker–Volgenant style potentials): rows are inserted one at a time and
//! each insertion runs a Dijkstra-like sweep over reduced costs, giving
//! `O(N³)` per matrix. Costs are the negated scores, accumulated in `f64`.
//!
//! Batches are solved per sample; `solve_batch` fans the samples out with
//! rayon since there is no joint closed form for a batch.
//!
//! The result is always a full bijection. Padding slots usually receive a
//! self-assignment because the predictor scores them that way, but activity
//! is decided downstream by the diagonal test, never here.

mod permutation;

pub use permutation::Permutation;

use crate::error::DecodeError;
use log::debug;
use nalgebra::DMatrix;
use rayon::prelude::*;

/// Solve one square score matrix for the maximum total assignment.
pub fn solve(score: &DMatrix<f32>) -> Result<Permutation, DecodeError> {
    let (rows, cols) = score.shape();
    if rows != cols {
        return Err(DecodeError::NotSquare { rows, cols });
    }
    if let Some((idx, _)) = score.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        // nalgebra storage is column-major.
        return Err(DecodeError::NonFiniteScore {
            row: idx % rows,
            col: idx / rows,
        });
    }
    let n = rows;
    if n == 0 {
        return Ok(Permutation::identity(0));
    }

    // 1-based arrays; index 0 is the virtual source column.
    let cost = |i: usize, j: usize| -(score[(i - 1, j - 1)] as f64);
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; n + 1];
    let mut row_of_col = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];
    let mut minv = vec![f64::INFINITY; n + 1];
    let mut used = vec![false; n + 1];

    for i in 1..=n {
        row_of_col[0] = i;
        let mut j0 = 0usize;
        minv.iter_mut().for_each(|m| *m = f64::INFINITY);
        used.iter_mut().for_each(|flag| *flag = false);
        loop {
            used[j0] = true;
            let i0 = row_of_col[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;
            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = cost(i0, j) - u[i0] - v[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            for j in 0..=n {
                if used[j] {
                    u[row_of_col[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if row_of_col[j0] == 0 {
                break;
            }
        }
        // Flip the augmenting path back to the source.
        loop {
            let j1 = way[j0];
            row_of_col[j0] = row_of_col[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0usize; n];
    for j in 1..=n {
        assignment[row_of_col[j] - 1] = j - 1;
    }
    Ok(Permutation::from_assignment_unchecked(assignment))
}

/// Solve every sample of a batch independently and in parallel.
pub fn solve_batch(scores: &[DMatrix<f32>]) -> Result<Vec<Permutation>, DecodeError> {
    debug!("assignment::solve_batch samples={}", scores.len());
    scores.par_iter().map(solve).collect()
}
