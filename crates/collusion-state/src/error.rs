//! Error types for collusion-state

use thiserror::Error;

use crate::worker::WorkerId;

/// Errors raised when constructing an [`Estimator`](crate::Estimator).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    /// A bound or estimate was NaN or infinite
    #[error("estimate is not a finite number: {0}")]
    NotFinite(f64),

    /// A bound or estimate fell outside [0, 1]
    #[error("estimate {0} is outside [0, 1]")]
    OutOfRange(f64),

    /// `low` was greater than `high`
    #[error("inverted interval: low {low} > high {high}")]
    InvertedInterval { low: f64, high: f64 },

    /// An explicit estimate was not contained in its own interval
    #[error("estimate {estimate} lies outside its interval [{low}, {high}]")]
    EstimateOutsideInterval { estimate: f64, low: f64, high: f64 },
}

/// Errors surfaced by a [`ReputationSystem`](crate::ReputationSystem) query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReputationError {
    /// The collaborator could not produce an estimate for this query
    #[error("estimate unavailable: {0}")]
    Unavailable(String),

    /// The query named a worker the reputation system has never seen
    #[error("unknown worker: {0}")]
    UnknownWorker(WorkerId),

    /// The collaborator produced a malformed estimator
    #[error("invalid estimate: {0}")]
    InvalidEstimate(#[from] EstimateError),
}

/// Result type for estimator construction
pub type EstimateResult<T> = std::result::Result<T, EstimateError>;

/// Result type for reputation queries
pub type ReputationResult<T> = std::result::Result<T, ReputationError>;
