//! Error types for the `kpick` library.
//!
//! Configuration errors fail fast at construction; nothing is silently
//! clamped. Round-level errors abort the current round; there are no
//! retries anywhere in the crate.

use thiserror::Error;

/// Result type alias for policy and optimizer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by constructors, optimizers, samplers, and policy calls.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The subset size is incompatible with the ground set.
    #[error("invalid subset size: k={k} must satisfy 1 <= k <= {n}")]
    InvalidSubsetSize { k: usize, n: usize },

    /// A policy-specific parameter failed its construction check.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The policy requires a hint vector but none was supplied.
    #[error("this policy requires a hint vector")]
    HintRequired,

    /// A vector argument had the wrong length for the ground set.
    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// The reward set was empty.
    #[error("reward set must contain at least one element")]
    EmptyReward,

    /// An element id fell outside the ground set `[1, n]`.
    #[error("element {element} outside ground set [1, {n}]")]
    ElementOutOfRange { element: usize, n: usize },

    /// Inclusion probabilities were not a valid fractional k-subset.
    #[error("infeasible marginals: {0}")]
    InfeasibleMarginals(String),

    /// A reward was fed before the policy produced a prediction this round.
    #[error("feed_reward called before get_k_set produced a prediction")]
    NoPrediction,
}
