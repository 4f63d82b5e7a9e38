//! Scripted reputation systems (testing only)
//!
//! Provides `ScriptedReputation`, a `ReputationSystem` whose answers are
//! set up front (and adjustable at runtime) instead of estimated from
//! evidence. Each query can be made to fail independently, and every query
//! is counted so tests can assert how often a consumer asked.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{ReputationError, ReputationResult};
use crate::estimator::Estimator;
use crate::reputation::ReputationSystem;
use crate::worker::WorkerId;

/// The three queries of the reputation contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    Joint,
    Pairwise,
    Fraction,
}

#[derive(Debug, Default)]
struct Script {
    exact: HashMap<BTreeSet<WorkerId>, Estimator>,
    by_size: HashMap<usize, Estimator>,
    joint_fallback: Estimator,
    pairwise: HashMap<WorkerId, Estimator>,
    pairwise_fallback: Option<Estimator>,
    fraction: Estimator,
    failing: HashSet<Query>,
}

/// Reputation double with table-driven answers.
///
/// Joint likelihood lookup order: exact worker set, then set size, then
/// the fallback (default: confident zero). Pairwise lookup order: the
/// per-candidate table, then the pairwise fallback, then the joint
/// likelihood of `reference ∪ {candidate}`.
#[derive(Debug, Default)]
pub struct ScriptedReputation {
    script: Mutex<Script>,
    joint_calls: AtomicU64,
    pairwise_calls: AtomicU64,
    fraction_calls: AtomicU64,
}

impl ScriptedReputation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer for exactly this worker set.
    pub fn with_joint_for<I, W>(self, workers: I, estimate: Estimator) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<WorkerId>,
    {
        let key = workers.into_iter().map(Into::into).collect();
        self.script.lock().exact.insert(key, estimate);
        self
    }

    /// Answer for every worker set of the given size.
    pub fn with_joint_for_size(self, size: usize, estimate: Estimator) -> Self {
        self.script.lock().by_size.insert(size, estimate);
        self
    }

    /// Answer for joint queries no other rule matches.
    pub fn with_joint_fallback(self, estimate: Estimator) -> Self {
        self.script.lock().joint_fallback = estimate;
        self
    }

    /// Pairwise answer for one candidate, regardless of reference group.
    pub fn with_pairwise(self, candidate: impl Into<WorkerId>, estimate: Estimator) -> Self {
        self.script.lock().pairwise.insert(candidate.into(), estimate);
        self
    }

    /// Pairwise answer for candidates missing from the per-candidate table.
    pub fn with_pairwise_fallback(self, estimate: Estimator) -> Self {
        self.script.lock().pairwise_fallback = Some(estimate);
        self
    }

    pub fn with_fraction(self, estimate: Estimator) -> Self {
        self.script.lock().fraction = estimate;
        self
    }

    /// Make `query` fail with [`ReputationError::Unavailable`].
    pub fn failing(self, query: Query) -> Self {
        self.script.lock().failing.insert(query);
        self
    }

    /// Replace the colluders-fraction answer while the double is shared.
    pub fn set_fraction(&self, estimate: Estimator) {
        self.script.lock().fraction = estimate;
    }

    /// Replace one candidate's pairwise answer while the double is shared.
    pub fn set_pairwise(&self, candidate: impl Into<WorkerId>, estimate: Estimator) {
        self.script.lock().pairwise.insert(candidate.into(), estimate);
    }

    pub fn fail(&self, query: Query) {
        self.script.lock().failing.insert(query);
    }

    pub fn recover(&self, query: Query) {
        self.script.lock().failing.remove(&query);
    }

    /// Number of times `query` has been asked (including failed asks).
    pub fn calls(&self, query: Query) -> u64 {
        match query {
            Query::Joint => self.joint_calls.load(Ordering::Relaxed),
            Query::Pairwise => self.pairwise_calls.load(Ordering::Relaxed),
            Query::Fraction => self.fraction_calls.load(Ordering::Relaxed),
        }
    }

    fn check(&self, query: Query) -> ReputationResult<()> {
        if self.script.lock().failing.contains(&query) {
            debug!(query = ?query, "scripted reputation failure");
            return Err(ReputationError::Unavailable(format!(
                "scripted failure for {query:?} query"
            )));
        }
        Ok(())
    }

    fn lookup_joint(&self, workers: &BTreeSet<WorkerId>) -> Estimator {
        let script = self.script.lock();
        script
            .exact
            .get(workers)
            .or_else(|| script.by_size.get(&workers.len()))
            .copied()
            .unwrap_or(script.joint_fallback)
    }
}

impl ReputationSystem for ScriptedReputation {
    fn joint_collusion_likelihood(
        &self,
        workers: &BTreeSet<WorkerId>,
    ) -> ReputationResult<Estimator> {
        self.joint_calls.fetch_add(1, Ordering::Relaxed);
        self.check(Query::Joint)?;
        Ok(self.lookup_joint(workers))
    }

    fn pairwise_collusion_likelihood(
        &self,
        reference: &BTreeSet<WorkerId>,
        candidates: &[WorkerId],
    ) -> ReputationResult<HashMap<WorkerId, Estimator>> {
        self.pairwise_calls.fetch_add(1, Ordering::Relaxed);
        self.check(Query::Pairwise)?;

        let mut out = HashMap::with_capacity(candidates.len());
        for candidate in candidates {
            let scripted = {
                let script = self.script.lock();
                script
                    .pairwise
                    .get(candidate)
                    .copied()
                    .or(script.pairwise_fallback)
            };
            let estimate = match scripted {
                Some(e) => e,
                None => {
                    let mut joint = reference.clone();
                    joint.insert(candidate.clone());
                    self.lookup_joint(&joint)
                }
            };
            out.insert(candidate.clone(), estimate);
        }
        Ok(out)
    }

    fn colluders_fraction(&self) -> ReputationResult<Estimator> {
        self.fraction_calls.fetch_add(1, Ordering::Relaxed);
        self.check(Query::Fraction)?;
        Ok(self.script.lock().fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> BTreeSet<WorkerId> {
        ids.iter().map(|s| WorkerId::from(*s)).collect()
    }

    #[test]
    fn test_exact_rule_beats_size_rule() {
        let rep = ScriptedReputation::new()
            .with_joint_for(["a", "b"], Estimator::point(0.7).unwrap())
            .with_joint_for_size(2, Estimator::point(0.2).unwrap());

        let exact = rep.joint_collusion_likelihood(&set(&["a", "b"])).unwrap();
        let sized = rep.joint_collusion_likelihood(&set(&["c", "d"])).unwrap();
        let other = rep.joint_collusion_likelihood(&set(&["c"])).unwrap();

        assert_eq!(exact.estimate(), 0.7);
        assert_eq!(sized.estimate(), 0.2);
        assert_eq!(other, Estimator::zero());
        assert_eq!(rep.calls(Query::Joint), 3);
    }

    #[test]
    fn test_pairwise_table_then_fallback() {
        let rep = ScriptedReputation::new()
            .with_pairwise("b", Estimator::point(0.05).unwrap())
            .with_pairwise_fallback(Estimator::unknown());

        let candidates = vec![WorkerId::from("b"), WorkerId::from("c")];
        let out = rep
            .pairwise_collusion_likelihood(&set(&["a"]), &candidates)
            .unwrap();
        assert_eq!(out[&WorkerId::from("b")].estimate(), 0.05);
        assert_eq!(out[&WorkerId::from("c")], Estimator::unknown());
    }

    #[test]
    fn test_pairwise_without_table_uses_joint() {
        let rep = ScriptedReputation::new()
            .with_joint_for(["a", "c"], Estimator::point(0.4).unwrap());
        let out = rep
            .pairwise_collusion_likelihood(&set(&["a"]), &[WorkerId::from("c")])
            .unwrap();
        assert_eq!(out[&WorkerId::from("c")].estimate(), 0.4);
    }

    #[test]
    fn test_failure_injection_and_recovery() {
        let rep = ScriptedReputation::new().failing(Query::Fraction);
        assert!(matches!(
            rep.colluders_fraction(),
            Err(ReputationError::Unavailable(_))
        ));

        rep.recover(Query::Fraction);
        assert!(rep.colluders_fraction().is_ok());
        assert_eq!(rep.calls(Query::Fraction), 2);
    }

    #[test]
    fn test_set_fraction_while_shared() {
        let rep = std::sync::Arc::new(ScriptedReputation::new());
        rep.set_fraction(Estimator::point(0.2).unwrap());
        assert_eq!(rep.colluders_fraction().unwrap().estimate(), 0.2);
    }
}
