//! Scripted predictor for demos and tests.
//!
//! Replays fixed target sequences one token per step and reports a fixed
//! successor map through the pairwise score projections, so a full decode
//! can run without a neural model.

use crate::decoder::{Predictor, ScoreProjections, StepOutput};
use crate::error::DecodeError;
use crate::tokenizer::Tokenizer;
use crate::types::{Sequence, Vertex};
use nalgebra::DMatrix;

/// Logit given to the scripted token; every other token gets zero.
pub const SCRIPTED_LOGIT: f32 = 8.0;

/// One scripted sample: the vertices to emit and the slot successor map.
#[derive(Clone, Debug)]
pub struct ScriptedSample {
    pub vertices: Vec<Vertex>,
    /// `successors[i]` is slot `i`'s successor; unlisted slots self-loop.
    pub successors: Vec<usize>,
}

/// Predictor that replays encoded sequences and fixed successor maps.
#[derive(Clone, Debug)]
pub struct ScriptedPredictor {
    targets: Vec<Sequence>,
    successors: Vec<Vec<usize>>,
    vocab_size: usize,
    pad: u32,
    n_slots: usize,
}

impl ScriptedPredictor {
    pub fn new(tokenizer: &Tokenizer, samples: &[ScriptedSample]) -> Result<Self, DecodeError> {
        let n_slots = tokenizer.n_vertices();
        let mut targets = Vec::with_capacity(samples.len());
        let mut successors = Vec::with_capacity(samples.len());
        for sample in samples {
            targets.push(tokenizer.encode(&sample.vertices, tokenizer.max_len())?);
            if let Some(&bad) = sample.successors.iter().find(|&&s| s >= n_slots) {
                return Err(DecodeError::InvalidParams(format!(
                    "successor {bad} outside 0..{n_slots}"
                )));
            }
            let mut map: Vec<usize> = (0..n_slots).collect();
            for (slot, &succ) in sample.successors.iter().take(n_slots).enumerate() {
                map[slot] = succ;
            }
            successors.push(map);
        }
        Ok(Self {
            targets,
            successors,
            vocab_size: tokenizer.vocab_size(),
            pad: tokenizer.pad(),
            n_slots,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.targets.len()
    }
}

impl Predictor for ScriptedPredictor {
    type Context = ();

    fn predict(&self, _context: &(), prefixes: &[Sequence]) -> Result<StepOutput, DecodeError> {
        if prefixes.len() != self.targets.len() {
            return Err(DecodeError::ShapeMismatch {
                what: "scripted batch",
                expected: self.targets.len(),
                actual: prefixes.len(),
            });
        }
        let mut out = StepOutput::default();
        for (b, prefix) in prefixes.iter().enumerate() {
            let next = self.targets[b].get(prefix.len()).copied().unwrap_or(self.pad);
            let mut logits = vec![0.0f32; self.vocab_size];
            logits[next as usize] = SCRIPTED_LOGIT;
            out.logits.push(logits);
            out.features
                .push(self.successors[b].iter().map(|&s| s as f32).collect());
        }
        Ok(out)
    }

    fn score_projections(&self, feature: &[f32]) -> Result<ScoreProjections, DecodeError> {
        if feature.len() != self.n_slots {
            return Err(DecodeError::ShapeMismatch {
                what: "scripted feature",
                expected: self.n_slots,
                actual: feature.len(),
            });
        }
        let mut a = DMatrix::zeros(self.n_slots, self.n_slots);
        for (i, &s) in feature.iter().enumerate() {
            let col = s as usize;
            if col >= self.n_slots {
                return Err(DecodeError::Predictor(format!(
                    "scripted successor {s} outside 0..{}",
                    self.n_slots
                )));
            }
            a[(i, col)] = 1.0;
        }
        Ok(ScoreProjections::Pairwise(
            a,
            DMatrix::zeros(self.n_slots, self.n_slots),
        ))
    }
}
