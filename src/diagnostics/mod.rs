//! Timing and summary records attached to pipeline runs.

pub mod timing;

pub use timing::{StageTiming, TimingBreakdown};
