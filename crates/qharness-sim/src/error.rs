//! Error types for the sim crate.

use thiserror::Error;

use crate::counts::OutcomeCounts;

/// Errors produced while building, injecting, sampling or estimating.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The ansatz needs at least one qubit.
    #[error("Invalid dimension: {what} must be at least 1, got {got}")]
    InvalidDimension {
        /// Which dimension was rejected.
        what: &'static str,
        /// The rejected value.
        got: u64,
    },

    /// A circuit dimension exceeds its configured bound.
    #[error("Circuit too large: {what} is {got}, limit is {max}")]
    DimensionTooLarge {
        /// Which dimension was rejected.
        what: &'static str,
        /// The rejected value.
        got: u64,
        /// Upper bound in effect.
        max: u64,
    },

    /// Noise probability outside `[0, 1]`.
    #[error("Invalid probability: {0} is outside [0, 1]")]
    InvalidProbability(f64),

    /// Shot count is zero or above the configured bound.
    #[error("Invalid shot count {shots}: must be in [1, {max}]")]
    InvalidShots {
        /// Requested shots.
        shots: u64,
        /// Upper bound in effect.
        max: u64,
    },

    /// Counts histogram holds no shots.
    #[error("Outcome counts are empty, nothing to estimate")]
    EmptyCounts,

    /// Sampling stopped early; the partial histogram is attached.
    #[error(
        "Sampling cancelled after {} of {} shots",
        .partial.total_shots(),
        .partial.requested_shots()
    )]
    CancelledSampling {
        /// Counts gathered before cancellation.
        partial: Box<OutcomeCounts>,
    },

    /// An observable references a qubit that the counts do not cover.
    #[error("Observable references qubit {qubit} but outcomes only have {n_qubits} qubits")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: u32,
        /// Width of the measured bitstrings.
        n_qubits: u32,
    },

    /// The worker pool could not be created.
    #[error("Failed to build sampling thread pool: {0}")]
    ThreadPool(String),

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qharness_ir::IrError),
}

impl SimError {
    /// True for errors caused by out-of-range caller input rather than by
    /// the simulation itself.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            SimError::InvalidDimension { .. }
                | SimError::DimensionTooLarge { .. }
                | SimError::InvalidProbability(_)
                | SimError::InvalidShots { .. }
                | SimError::QubitOutOfRange { .. }
        )
    }
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
