//! Collusion-State: trust estimates for collusion-resistant scheduling
//!
//! This crate defines the values and the collaborator contract that the
//! certification and grouping algorithms consume. It never estimates
//! anything itself: estimators come from an external reputation system.
//!
//! ## Layer 0 - Trust data
//!
//! Focus: immutable estimator values, opaque worker identity, and a
//! read-only query trait with an optimistic default.
//!
//! ## Key Components
//!
//! - `WorkerId`: opaque worker identity
//! - `Estimator`: probability in [0, 1] with an uncertainty interval
//! - `ReputationSystem`: joint / pairwise collusion likelihood and the
//!   population colluders fraction
//! - `OptimisticReputation`: the default source (no collusion known)
//! - `fakes::ScriptedReputation`: table-driven double for tests

mod error;
mod estimator;
pub mod fakes;
mod reputation;
mod worker;

pub use error::{EstimateError, EstimateResult, ReputationError, ReputationResult};
pub use estimator::Estimator;
pub use reputation::{OptimisticReputation, ReputationSystem};
pub use worker::WorkerId;
