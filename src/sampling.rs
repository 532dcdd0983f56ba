//! Next-token selection for the autoregressive driver.
//!
//! Logits are first filtered (top-k, then nucleus/top-p), then normalised with
//! a numerically stable softmax. The top-1 probability of the filtered
//! distribution is the step's confidence. Exactly one policy is active per
//! run: greedy argmax, or a multinomial draw from the filtered distribution
//! using a caller-supplied random generator.

use crate::error::DecodeError;
use crate::types::Token;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Token selection policy for one generation run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingPolicy {
    /// Argmax of the (unfiltered) distribution.
    Greedy,
    /// Multinomial draw after top-k and top-p filtering.
    /// `top_k == 0` disables the top-k filter, `top_p >= 1` disables top-p.
    Stochastic { top_k: usize, top_p: f32 },
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        SamplingPolicy::Greedy
    }
}

impl SamplingPolicy {
    /// `top_k == 0` together with `top_p == 1` selects greedy decoding. Any
    /// other `top_p` samples, though values above 1 filter nothing.
    pub fn from_params(top_k: usize, top_p: f32) -> Self {
        if top_k == 0 && top_p == 1.0 {
            SamplingPolicy::Greedy
        } else {
            SamplingPolicy::Stochastic { top_k, top_p }
        }
    }

    fn filter_params(&self) -> (usize, f32) {
        match *self {
            SamplingPolicy::Greedy => (0, 1.0),
            SamplingPolicy::Stochastic { top_k, top_p } => (top_k, top_p),
        }
    }
}

/// Token chosen at one step together with its confidence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampledToken {
    pub token: Token,
    /// Highest probability of the filtered distribution.
    pub confidence: f32,
}

/// Mask logits outside the top-k / nucleus set with `-inf`.
///
/// Top-k keeps every logit at least as large as the k-th largest. Top-p keeps
/// the smallest prefix of the descending order whose cumulative probability
/// reaches `top_p`; at least one token always survives.
pub fn filter_logits(logits: &mut [f32], top_k: usize, top_p: f32) {
    if logits.is_empty() {
        return;
    }
    if top_k > 0 && top_k < logits.len() {
        let mut sorted: Vec<f32> = logits.to_vec();
        sorted.sort_unstable_by(|a, b| b.total_cmp(a));
        let kth = sorted[top_k - 1];
        for v in logits.iter_mut() {
            if *v < kth {
                *v = f32::NEG_INFINITY;
            }
        }
    }
    if top_p < 1.0 {
        let probs = softmax(logits);
        let mut order: Vec<usize> = (0..logits.len()).collect();
        order.sort_by(|&a, &b| probs[b].total_cmp(&probs[a]));
        let mut cumulative = 0.0f32;
        let mut keep = order.len();
        for (rank, &idx) in order.iter().enumerate() {
            cumulative += probs[idx];
            if cumulative >= top_p {
                keep = rank + 1;
                break;
            }
        }
        for &idx in &order[keep..] {
            logits[idx] = f32::NEG_INFINITY;
        }
    }
}

/// Numerically stable softmax; `-inf` logits map to probability zero.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return vec![0.0; logits.len()];
    }
    let exps: Vec<f32> = logits.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the first maximum.
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0usize;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Filter, normalise and pick the next token for one sample.
pub fn sample_next<R: Rng + ?Sized>(
    logits: &[f32],
    policy: SamplingPolicy,
    rng: &mut R,
) -> Result<SampledToken, DecodeError> {
    if let Some(i) = logits.iter().position(|v| v.is_nan()) {
        return Err(DecodeError::Predictor(format!("logit {i} is NaN")));
    }
    if let Some(i) = logits.iter().position(|&v| v == f32::INFINITY) {
        return Err(DecodeError::Predictor(format!("logit {i} is +inf")));
    }
    if !logits.iter().any(|v| v.is_finite()) {
        return Err(DecodeError::Predictor("step has no finite logit".into()));
    }
    let (top_k, top_p) = policy.filter_params();
    let mut filtered = logits.to_vec();
    filter_logits(&mut filtered, top_k, top_p);
    let probs = softmax(&filtered);
    let best = argmax(&probs);
    let confidence = probs.get(best).copied().unwrap_or(0.0);
    let token = match policy {
        SamplingPolicy::Greedy => best,
        SamplingPolicy::Stochastic { .. } => WeightedIndex::new(&probs)
            .map_err(|e| DecodeError::Predictor(format!("cannot sample step distribution: {e}")))?
            .sample(rng),
    };
    Ok(SampledToken {
        token: token as Token,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_params_select_greedy() {
        assert_eq!(SamplingPolicy::from_params(0, 1.0), SamplingPolicy::Greedy);
        assert_eq!(
            SamplingPolicy::from_params(5, 1.0),
            SamplingPolicy::Stochastic {
                top_k: 5,
                top_p: 1.0
            }
        );
        assert!(matches!(
            SamplingPolicy::from_params(0, 0.9),
            SamplingPolicy::Stochastic { .. }
        ));
    }

    #[test]
    fn top_k_keeps_k_largest() {
        let mut logits = vec![1.0, 4.0, 3.0, 2.0];
        filter_logits(&mut logits, 2, 1.0);
        assert_eq!(logits[1], 4.0);
        assert_eq!(logits[2], 3.0);
        assert!(logits[0].is_infinite() && logits[3].is_infinite());
    }

    #[test]
    fn top_p_keeps_smallest_prefix_reaching_threshold() {
        // probabilities 0.5, 0.3, 0.2
        let mut logits = vec![0.5f32.ln(), 0.3f32.ln(), 0.2f32.ln()];
        filter_logits(&mut logits, 0, 0.75);
        assert!(logits[0].is_finite());
        assert!(logits[1].is_finite());
        assert_eq!(logits[2], f32::NEG_INFINITY);

        let mut tight = vec![0.5f32.ln(), 0.3f32.ln(), 0.2f32.ln()];
        filter_logits(&mut tight, 0, 0.1);
        assert!(tight[0].is_finite());
        assert!(tight[1..].iter().all(|v| v.is_infinite()));
    }

    #[test]
    fn softmax_ignores_masked_entries() {
        let probs = softmax(&[0.0, f32::NEG_INFINITY, 0.0]);
        assert!((probs[0] - 0.5).abs() < 1e-6);
        assert_eq!(probs[1], 0.0);
    }

    #[test]
    fn greedy_reports_top_probability() {
        let mut rng = StdRng::seed_from_u64(7);
        let s = sample_next(&[0.0, 2.0, 0.0], SamplingPolicy::Greedy, &mut rng).unwrap();
        assert_eq!(s.token, 1);
        let e2 = 2.0f32.exp();
        assert!((s.confidence - e2 / (e2 + 2.0)).abs() < 1e-6);
    }

    #[test]
    fn stochastic_draw_stays_inside_filtered_set() {
        let mut rng = StdRng::seed_from_u64(11);
        let policy = SamplingPolicy::Stochastic { top_k: 2, top_p: 1.0 };
        for _ in 0..200 {
            let s = sample_next(&[5.0, 4.9, -1.0, -2.0], policy, &mut rng).unwrap();
            assert!(s.token < 2, "token {} escaped the top-k set", s.token);
        }
    }

    #[test]
    fn nan_logits_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(sample_next(&[0.0, f32::NAN], SamplingPolicy::Greedy, &mut rng).is_err());
    }

    #[test]
    fn infinite_or_fully_masked_logits_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let stochastic = SamplingPolicy::Stochastic { top_k: 0, top_p: 0.9 };
        let pos_inf = [0.0, 0.0, f32::INFINITY, 0.0];
        let masked = [f32::NEG_INFINITY; 4];
        let empty: [f32; 0] = [];
        for policy in [SamplingPolicy::Greedy, stochastic] {
            for logits in [&pos_inf[..], &masked[..], &empty[..]] {
                assert!(
                    matches!(
                        sample_next(logits, policy, &mut rng),
                        Err(DecodeError::Predictor(_))
                    ),
                    "logits {logits:?} accepted under {policy:?}"
                );
            }
        }
    }

    #[test]
    fn partially_masked_logits_still_sample() {
        let mut rng = StdRng::seed_from_u64(0);
        let logits = [f32::NEG_INFINITY, 1.0, f32::NEG_INFINITY];
        let s = sample_next(&logits, SamplingPolicy::Greedy, &mut rng).unwrap();
        assert_eq!(s.token, 1);
        assert!((s.confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn top_p_above_one_still_samples() {
        assert_eq!(
            SamplingPolicy::from_params(0, 1.5),
            SamplingPolicy::Stochastic {
                top_k: 0,
                top_p: 1.5
            }
        );
    }
}
