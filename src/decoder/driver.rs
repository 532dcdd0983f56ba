use super::params::DecoderParams;
use super::predictor::{Predictor, StepOutput};
use crate::assignment::{self, Permutation};
use crate::error::DecodeError;
use crate::sampling::{sample_next, SamplingPolicy};
use crate::tokenizer::Tokenizer;
use crate::types::Sequence;
use log::debug;
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// Raw result of one generation run, one entry per sample.
#[derive(Clone, Debug)]
pub struct Generation {
    /// `BOS` followed by one generated token per step.
    pub sequences: Vec<Sequence>,
    /// Confidence captured at each even step (one per vertex slot).
    pub confidences: Vec<Vec<f32>>,
    /// Combined score matrices built from the last step's features.
    pub scores: Vec<DMatrix<f32>>,
    /// Optimal assignment of each score matrix.
    pub permutations: Vec<Permutation>,
    pub elapsed_ms: f64,
}

/// Drives an external [`Predictor`] token by token.
#[derive(Clone, Debug)]
pub struct DecoderDriver {
    tokenizer: Tokenizer,
    params: DecoderParams,
}

impl DecoderDriver {
    pub fn new(tokenizer: Tokenizer, params: DecoderParams) -> Self {
        Self { tokenizer, params }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn params(&self) -> &DecoderParams {
        &self.params
    }

    pub fn policy(&self) -> SamplingPolicy {
        self.params.policy()
    }

    /// Number of predictor calls per run.
    pub fn steps(&self) -> usize {
        self.params
            .steps
            .unwrap_or_else(|| self.tokenizer.generation_steps())
    }

    /// Random generator for stochastic runs, seeded from the parameters.
    pub fn seeded_rng(&self) -> StdRng {
        match self.params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Generate `batch_size` sequences and their permutations.
    pub fn generate<P, R>(
        &self,
        predictor: &P,
        context: &P::Context,
        batch_size: usize,
        rng: &mut R,
    ) -> Result<Generation, DecodeError>
    where
        P: Predictor + ?Sized,
        R: Rng + ?Sized,
    {
        let steps = self.steps();
        if steps == 0 {
            return Err(DecodeError::InvalidParams(
                "generation needs at least one step".into(),
            ));
        }
        let policy = self.policy();
        debug!(
            "DecoderDriver::generate start batch={} steps={} policy={:?}",
            batch_size, steps, policy
        );
        let start = Instant::now();

        let mut sequences: Vec<Sequence> = (0..batch_size)
            .map(|_| {
                let mut seq = Vec::with_capacity(steps + 1);
                seq.push(self.tokenizer.bos());
                seq
            })
            .collect();
        let mut confidences: Vec<Vec<f32>> =
            vec![Vec::with_capacity(steps.div_ceil(2)); batch_size];
        let mut last_features: Vec<Vec<f32>> = Vec::new();

        for step in 0..steps {
            let out = predictor.predict(context, &sequences)?;
            self.check_step_shapes(&out, batch_size)?;
            for (sample, logits) in out.logits.iter().enumerate() {
                let picked = sample_next(logits, policy, rng)?;
                if step % 2 == 0 {
                    confidences[sample].push(picked.confidence);
                }
                sequences[sample].push(picked.token);
            }
            last_features = out.features;
        }

        let n = self.tokenizer.n_vertices();
        let scores = last_features
            .iter()
            .map(|feature| predictor.score_projections(feature)?.combine(n))
            .collect::<Result<Vec<_>, _>>()?;
        let permutations = assignment::solve_batch(&scores)?;

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "DecoderDriver::generate done batch={} active_slots={:?} elapsed_ms={:.3}",
            batch_size,
            permutations
                .iter()
                .map(Permutation::active_count)
                .collect::<Vec<_>>(),
            elapsed_ms
        );
        Ok(Generation {
            sequences,
            confidences,
            scores,
            permutations,
            elapsed_ms,
        })
    }

    fn check_step_shapes(&self, out: &StepOutput, batch_size: usize) -> Result<(), DecodeError> {
        if out.logits.len() != batch_size {
            return Err(DecodeError::ShapeMismatch {
                what: "logits batch",
                expected: batch_size,
                actual: out.logits.len(),
            });
        }
        if out.features.len() != batch_size {
            return Err(DecodeError::ShapeMismatch {
                what: "features batch",
                expected: batch_size,
                actual: out.features.len(),
            });
        }
        let vocab = self.tokenizer.vocab_size();
        if let Some(bad) = out.logits.iter().find(|l| l.len() != vocab) {
            return Err(DecodeError::ShapeMismatch {
                what: "vocab size",
                expected: vocab,
                actual: bad.len(),
            });
        }
        Ok(())
    }
}
