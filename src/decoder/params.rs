use crate::sampling::SamplingPolicy;
use serde::{Deserialize, Serialize};

/// Parameters for one generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderParams {
    /// Keep only the k most likely tokens; `0` disables the filter.
    pub top_k: usize,
    /// Nucleus threshold; `1.0` disables the filter.
    pub top_p: f32,
    /// Number of generated tokens. `None` uses `2N + 1`, filling `2N + 2`.
    pub steps: Option<usize>,
    /// Seed for [`DecoderDriver::seeded_rng`](super::DecoderDriver::seeded_rng);
    /// `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for DecoderParams {
    fn default() -> Self {
        Self {
            top_k: 0,
            top_p: 1.0,
            steps: None,
            seed: Some(42),
        }
    }
}

impl DecoderParams {
    pub fn policy(&self) -> SamplingPolicy {
        SamplingPolicy::from_params(self.top_k, self.top_p)
    }
}
