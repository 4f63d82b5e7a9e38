//! Collusion Core Library
//!
//! Hardens redundant computation against colluding workers:
//!
//! - **Certification**: picks the result to trust among redundant
//!   submissions, discounting agreement among workers the reputation
//!   system suspects of colluding.
//! - **Grouping**: forms worker groups that stay singletons while
//!   collusion risk is negligible and grow, one member at a time, toward a
//!   size that keeps a colluding majority unlikely once it is not.
//!
//! Both components consume a shared [`ReputationSystem`] and never mutate it.

pub mod certification;
pub mod classes;
pub mod config;
pub mod error;
pub mod grouping;
pub mod metrics;
pub mod obs;
pub mod telemetry;

pub use certification::{
    adjusted_support, AgreementClass, Certification, CollusionAwareCertificator,
    ResultCertificator, SupportScore, MIN_SUBMISSIONS,
};
pub use classes::partition_by_equality;
pub use config::{CertifierConfig, CollusionConfig, GrouperConfig};
pub use error::{
    CertificationError, CertificationResult, ConfigError, GroupingError, GroupingResult,
};
pub use grouping::{
    min_size, select_extension, ExtensionChoice, GreedyGracefulGrouper, Group, GroupId,
    GroupSizing, GrowthState, ResourcesGrouper,
};
pub use metrics::METRICS;
pub use obs::CertificationSpan;
pub use telemetry::{init_tracing, init_tracing_from_env};

pub use collusion_state::{
    Estimator, OptimisticReputation, ReputationError, ReputationSystem, WorkerId,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
