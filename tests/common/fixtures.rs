use nalgebra::DMatrix;
use poly_decoder::assignment::Permutation;
use poly_decoder::synthetic::ScriptedSample;
use poly_decoder::{Tokenizer, TokenizerParams, Vertex};
use rand::Rng;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Tokenizer with a 1-pixel bin width and `n_vertices` slots.
pub fn unit_tokenizer(n_vertices: usize) -> Tokenizer {
    Tokenizer::new(TokenizerParams {
        num_bins: 224,
        image_size: 224.0,
        n_vertices,
    })
    .expect("valid tokenizer params")
}

/// Dense permutation matrix for `successor[i] = assignment[i]`.
pub fn permutation_matrix(assignment: &[usize]) -> DMatrix<f32> {
    Permutation::from_assignment(assignment.to_vec())
        .expect("valid permutation")
        .to_matrix()
}

pub fn random_scores<R: Rng>(rng: &mut R, n: usize) -> DMatrix<f32> {
    DMatrix::from_fn(n, n, |_, _| rng.gen_range(-1.0f32..1.0))
}

/// Best total score over all `n!` assignments.
pub fn brute_force_best(score: &DMatrix<f32>) -> f64 {
    let n = score.nrows();
    let mut cols: Vec<usize> = (0..n).collect();
    let mut best = f64::NEG_INFINITY;
    permute(&mut cols, 0, &mut |perm| {
        let total: f64 = perm
            .iter()
            .enumerate()
            .map(|(i, &j)| score[(i, j)] as f64)
            .sum();
        best = best.max(total);
    });
    best
}

/// Calls `visit` once for every ordering of `items` (Heap-style swaps).
pub fn permute<T, F: FnMut(&[T])>(items: &mut [T], k: usize, visit: &mut F) {
    if k == items.len() {
        visit(items);
        return;
    }
    for i in k..items.len() {
        items.swap(k, i);
        permute(items, k + 1, visit);
        items.swap(k, i);
    }
}

/// Ring rotated so its smallest slot comes first.
pub fn canonical_ring(ring: &[usize]) -> Vec<usize> {
    let Some(start) = ring
        .iter()
        .enumerate()
        .min_by_key(|&(_, v)| *v)
        .map(|(i, _)| i)
    else {
        return Vec::new();
    };
    ring[start..].iter().chain(&ring[..start]).copied().collect()
}

/// Sorted slot sets of `rings`, for order-insensitive comparison.
pub fn ring_sets(rings: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut sets: Vec<Vec<usize>> = rings
        .iter()
        .map(|r| {
            let mut s = r.clone();
            s.sort_unstable();
            s
        })
        .collect();
    sets.sort();
    sets
}

/// Axis-aligned square footprint traversed clockwise.
pub fn square_sample(top: f32, left: f32, side: f32) -> ScriptedSample {
    ScriptedSample {
        vertices: vec![
            Vertex::new(top, left),
            Vertex::new(top, left + side),
            Vertex::new(top + side, left + side),
            Vertex::new(top + side, left),
        ],
        successors: vec![1, 2, 3, 0],
    }
}

pub fn triangle_sample() -> ScriptedSample {
    ScriptedSample {
        vertices: vec![
            Vertex::new(100.0, 100.0),
            Vertex::new(100.0, 180.0),
            Vertex::new(170.0, 140.0),
        ],
        successors: vec![1, 2, 0],
    }
}
