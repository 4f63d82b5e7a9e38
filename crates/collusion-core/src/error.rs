//! Error taxonomy for certification, grouping and configuration.

use collusion_state::{ReputationError, WorkerId};

use crate::grouping::GroupId;

/// Errors produced when a result cannot be certified.
///
/// Always surfaced to the caller: resolving any of these to an arbitrary
/// result would defeat collusion resistance.
#[derive(Debug, thiserror::Error)]
pub enum CertificationError {
    #[error("submission mismatch: {workers} workers but {results} results")]
    LengthMismatch { workers: usize, results: usize },

    #[error("insufficient redundancy: {submitted} submission(s), at least {required} required")]
    InsufficientRedundancy { submitted: usize, required: usize },

    #[error("worker {0} submitted more than once")]
    DuplicateWorker(WorkerId),

    #[error("reputation query failed: {0}")]
    Reputation(#[from] ReputationError),

    #[error(
        "results are indistinguishable: best support [{best_low:.4}, {best_high:.4}] \
         overlaps runner-up [{rival_low:.4}, {rival_high:.4}]"
    )]
    Indistinguishable {
        best_low: f64,
        best_high: f64,
        rival_low: f64,
        rival_high: f64,
    },
}

/// Usage errors from the grouper. These indicate an integration bug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupingError {
    #[error("worker {0} was never registered with the grouper")]
    UnregisteredWorker(WorkerId),

    #[error("group {0} is not owned by this grouper")]
    UnknownGroup(GroupId),
}

/// Errors produced while parsing or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for certification.
pub type CertificationResult<T> = std::result::Result<T, CertificationError>;

/// Result type for grouping.
pub type GroupingResult<T> = std::result::Result<T, GroupingError>;
