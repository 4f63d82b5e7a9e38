//! The reputation system contract.
//!
//! Trust statistics are estimated elsewhere; this crate only defines the
//! read-only query surface consumed by certification and grouping:
//!
//! - `joint_collusion_likelihood`: probability that a worker set is a
//!   coordinated colluding block
//! - `pairwise_collusion_likelihood`: per-candidate probability of colluding
//!   with a reference group
//! - `colluders_fraction`: population-wide share of colluding workers
//!
//! Every method has an optimistic default body, so implementations (and
//! test doubles) override only the queries they actually answer.

use std::collections::{BTreeSet, HashMap};

use crate::error::ReputationResult;
use crate::estimator::Estimator;
use crate::worker::WorkerId;

/// Read-only source of collusion estimates.
///
/// Implementations must be safe for concurrent reads; consumers share a
/// single instance as `Arc<dyn ReputationSystem>` across threads.
pub trait ReputationSystem: Send + Sync {
    /// Likelihood that exactly this set of workers is colluding.
    ///
    /// Default: a confident zero (no collusion known).
    fn joint_collusion_likelihood(
        &self,
        _workers: &BTreeSet<WorkerId>,
    ) -> ReputationResult<Estimator> {
        Ok(Estimator::zero())
    }

    /// Likelihood that each candidate colludes with `reference`.
    ///
    /// Default: the joint likelihood of `reference ∪ {candidate}` for each
    /// candidate. Candidates absent from the returned map are treated by
    /// consumers as having no usable estimate.
    fn pairwise_collusion_likelihood(
        &self,
        reference: &BTreeSet<WorkerId>,
        candidates: &[WorkerId],
    ) -> ReputationResult<HashMap<WorkerId, Estimator>> {
        let mut out = HashMap::with_capacity(candidates.len());
        for candidate in candidates {
            let mut joint = reference.clone();
            joint.insert(candidate.clone());
            out.insert(candidate.clone(), self.joint_collusion_likelihood(&joint)?);
        }
        Ok(out)
    }

    /// Estimated fraction of the whole worker population that colludes.
    ///
    /// Default: a confident zero.
    fn colluders_fraction(&self) -> ReputationResult<Estimator> {
        Ok(Estimator::zero())
    }
}

/// The default reputation system: reports no collusion anywhere.
///
/// With this source certification degrades to plain majority vote and
/// grouping stays in graceful (singleton) mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimisticReputation;

impl OptimisticReputation {
    pub fn new() -> Self {
        Self
    }
}

impl ReputationSystem for OptimisticReputation {}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> BTreeSet<WorkerId> {
        ids.iter().map(|s| WorkerId::from(*s)).collect()
    }

    #[test]
    fn test_optimistic_reports_zero_everywhere() {
        let rep = OptimisticReputation::new();
        assert_eq!(
            rep.joint_collusion_likelihood(&set(&["a", "b"])).unwrap(),
            Estimator::zero()
        );
        assert_eq!(rep.colluders_fraction().unwrap(), Estimator::zero());
    }

    struct PairsWithB;

    impl ReputationSystem for PairsWithB {
        fn joint_collusion_likelihood(
            &self,
            workers: &BTreeSet<WorkerId>,
        ) -> ReputationResult<Estimator> {
            if workers.contains(&WorkerId::from("b")) {
                Ok(Estimator::point(0.9)?)
            } else {
                Ok(Estimator::point(0.1)?)
            }
        }
    }

    #[test]
    fn test_default_pairwise_derives_from_joint() {
        let rep = PairsWithB;
        let candidates = vec![WorkerId::from("b"), WorkerId::from("c")];
        let pairwise = rep
            .pairwise_collusion_likelihood(&set(&["a"]), &candidates)
            .unwrap();
        assert_eq!(pairwise.len(), 2);
        assert_eq!(pairwise[&WorkerId::from("b")].estimate(), 0.9);
        assert_eq!(pairwise[&WorkerId::from("c")].estimate(), 0.1);
    }

    #[test]
    fn test_trait_object_is_usable() {
        let rep: std::sync::Arc<dyn ReputationSystem> = std::sync::Arc::new(OptimisticReputation);
        assert_eq!(rep.colluders_fraction().unwrap().estimate(), 0.0);
    }
}
