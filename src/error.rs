//! Crate-wide error taxonomy.
//!
//! Every variant is fatal for the operation that produced it: configuration
//! and dimension errors indicate caller bugs, `InvalidArm` indicates a broken
//! internal invariant (arm indices are always agent-produced).  Nothing here
//! is transient — the core performs no retries.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid hyperparameters or simulator configuration, detected before
    /// any simulation starts.
    #[error("invalid configuration: {0}")]
    Configuration(&'static str),

    /// Context vector length does not match the agent's configured dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Arm index out of range in `update`.
    #[error("arm index {0} out of range")]
    InvalidArm(usize),

    /// Dataset adapter failure (missing file, malformed rows).  Surfaced to
    /// the caller unmodified; never recovered inside the core.
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Run-sink persistence failure.
    #[error("sink error: {0}")]
    Sink(#[from] std::io::Error),
}
