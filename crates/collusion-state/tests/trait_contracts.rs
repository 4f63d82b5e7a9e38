//! Trait contract tests for ReputationSystem.
//!
//! These tests verify the behavioral contract of the reputation query
//! surface using the optimistic default and the scripted double. Any
//! conforming implementation must pass these.

use std::collections::BTreeSet;
use std::sync::Arc;

use collusion_state::fakes::{Query, ScriptedReputation};
use collusion_state::{
    Estimator, OptimisticReputation, ReputationError, ReputationSystem, WorkerId,
};
use proptest::prelude::*;

fn workers(ids: &[&str]) -> BTreeSet<WorkerId> {
    ids.iter().map(|s| WorkerId::from(*s)).collect()
}

fn implementations() -> Vec<Arc<dyn ReputationSystem>> {
    vec![
        Arc::new(OptimisticReputation::new()),
        Arc::new(ScriptedReputation::new()),
    ]
}

// ===========================================================================
// Shared contract
// ===========================================================================

#[test]
fn joint_likelihood_is_a_probability() {
    for rep in implementations() {
        let e = rep
            .joint_collusion_likelihood(&workers(&["a", "b", "c"]))
            .unwrap();
        assert!((0.0..=1.0).contains(&e.estimate()));
        assert!(e.low() <= e.estimate() && e.estimate() <= e.high());
    }
}

#[test]
fn pairwise_answers_every_candidate_once() {
    let candidates: Vec<WorkerId> = ["b", "c", "d"].iter().map(|s| WorkerId::from(*s)).collect();
    for rep in implementations() {
        let out = rep
            .pairwise_collusion_likelihood(&workers(&["a"]), &candidates)
            .unwrap();
        assert_eq!(out.len(), candidates.len());
        for c in &candidates {
            assert!(out.contains_key(c));
        }
    }
}

#[test]
fn pairwise_with_no_candidates_is_empty() {
    for rep in implementations() {
        let out = rep
            .pairwise_collusion_likelihood(&workers(&["a"]), &[])
            .unwrap();
        assert!(out.is_empty());
    }
}

#[test]
fn fraction_defaults_to_confident_zero() {
    for rep in implementations() {
        let f = rep.colluders_fraction().unwrap();
        assert_eq!(f.estimate(), 0.0);
        assert_eq!(f.confidence(), 1.0);
    }
}

#[test]
fn queries_are_safe_from_many_threads() {
    let rep = Arc::new(
        ScriptedReputation::new().with_joint_for_size(2, Estimator::point(0.3).unwrap()),
    );
    std::thread::scope(|s| {
        for i in 0..8 {
            let rep = Arc::clone(&rep);
            s.spawn(move || {
                let set = workers(&["x", if i % 2 == 0 { "y" } else { "z" }]);
                let e = rep.joint_collusion_likelihood(&set).unwrap();
                assert_eq!(e.estimate(), 0.3);
            });
        }
    });
    assert_eq!(rep.calls(Query::Joint), 8);
}

// ===========================================================================
// Scripted double specifics
// ===========================================================================

#[test]
fn scripted_failures_are_per_query() {
    let rep = ScriptedReputation::new().failing(Query::Joint);
    assert!(matches!(
        rep.joint_collusion_likelihood(&workers(&["a"])),
        Err(ReputationError::Unavailable(_))
    ));
    assert!(rep.colluders_fraction().is_ok());
    assert!(rep
        .pairwise_collusion_likelihood(&workers(&["a"]), &[WorkerId::from("b")])
        .is_ok());
}

// ===========================================================================
// Estimator properties
// ===========================================================================

proptest! {
    #[test]
    fn prop_interval_estimator_respects_invariant(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let e = Estimator::interval(low, high).unwrap();
        prop_assert!(e.low() <= e.estimate() && e.estimate() <= e.high());
        prop_assert!((0.0..=1.0).contains(&e.confidence()));
    }

    #[test]
    fn prop_narrower_interval_is_more_confident(
        center in 0.3f64..=0.7,
        narrow in 0.0f64..0.1,
        extra in 0.01f64..0.15,
    ) {
        let tight = Estimator::interval(center - narrow, center + narrow).unwrap();
        let loose = Estimator::interval(center - narrow - extra, center + narrow + extra).unwrap();
        prop_assert!(tight.confidence() > loose.confidence());
    }
}
