use std::collections::BTreeSet;
use std::sync::Arc;

use collusion_core::{
    min_size, CollusionAwareCertificator, GreedyGracefulGrouper, GroupSizing, ResourcesGrouper,
};
use collusion_state::fakes::ScriptedReputation;
use collusion_state::{Estimator, WorkerId};
use proptest::prelude::*;

/// Agreement classes as (size, joint likelihood) pairs.
fn classes() -> impl Strategy<Value = Vec<(usize, f64)>> {
    prop::collection::vec((1usize..6, 0.01f64..0.99), 2..5)
}

/// Certify a submission set where class `c` submitted result `c`.
fn winner(classes: &[(usize, f64)]) -> u32 {
    let mut workers = Vec::new();
    let mut results = Vec::new();
    let mut rep = ScriptedReputation::new();
    for (c, &(size, p)) in classes.iter().enumerate() {
        let members: Vec<WorkerId> = (0..size)
            .map(|i| WorkerId::new(format!("c{c}-{i}")))
            .collect();
        rep = rep.with_joint_for(members.clone(), Estimator::point(p).unwrap());
        results.extend(std::iter::repeat(c as u32).take(size));
        workers.extend(members);
    }
    CollusionAwareCertificator::new(Arc::new(rep))
        .certify(&workers, &results)
        .unwrap()
        .result
}

fn pool() -> impl Strategy<Value = BTreeSet<usize>> {
    prop::collection::btree_set(0usize..20, 0..15)
}

fn ids(set: &BTreeSet<usize>) -> Vec<WorkerId> {
    set.iter().map(|i| WorkerId::new(format!("w{i:02}"))).collect()
}

proptest! {
    /// Property: raising one class's likelihood never makes it win
    #[test]
    fn prop_suspicion_never_helps_a_class(
        classes in classes(),
        pick in any::<prop::sample::Index>(),
        bump in 0.0f64..0.5,
    ) {
        let j = pick.index(classes.len());
        let before = winner(&classes);

        let mut raised = classes.clone();
        raised[j].1 = (raised[j].1 + bump).min(1.0);
        let after = winner(&raised);

        if after == j as u32 {
            prop_assert_eq!(before, j as u32);
        }
    }

    /// Property: equal likelihoods reduce to majority vote
    #[test]
    fn prop_equal_likelihood_is_majority(
        sizes in prop::collection::vec(1usize..6, 2..5),
        p in 0.01f64..0.99,
    ) {
        let classes: Vec<(usize, f64)> = sizes.iter().map(|&n| (n, p)).collect();
        let w = winner(&classes) as usize;
        let largest = *sizes.iter().max().unwrap();
        prop_assert_eq!(sizes[w], largest);
        prop_assert_eq!(w, sizes.iter().position(|&n| n == largest).unwrap());
    }

    /// Property: min_size is odd, bounded and non-decreasing
    #[test]
    fn prop_min_size_monotone(a in 0.0f64..0.6, b in 0.0f64..0.6) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (n_lo, n_hi) = (min_size(lo), min_size(hi));
        prop_assert!(n_lo <= n_hi, "min_size({}) = {} > min_size({}) = {}", lo, n_lo, hi, n_hi);
        prop_assert_eq!(n_hi % 2, 1);
        prop_assert!(n_hi <= 51);
    }

    /// Property: min_size depends only on its input
    #[test]
    fn prop_min_size_deterministic(f in 0.0f64..1.0, risk in 0.001f64..0.2) {
        let sizing = GroupSizing { majority_risk: risk, ..GroupSizing::default() };
        prop_assert_eq!(sizing.min_size(f), sizing.min_size(f));
        prop_assert_eq!(min_size(f), min_size(f));
    }

    /// Property: overlapping registrations equal one registration of the union
    #[test]
    fn prop_registration_idempotent(a in pool(), b in pool()) {
        let twice = GreedyGracefulGrouper::new(Arc::new(ScriptedReputation::new()));
        twice.add_all_workers(&ids(&a));
        twice.add_all_workers(&ids(&b));
        twice.add_all_workers(&ids(&a));

        let union: BTreeSet<usize> = a.union(&b).copied().collect();
        let once = GreedyGracefulGrouper::new(Arc::new(ScriptedReputation::new()));
        once.add_all_workers(&ids(&union));

        prop_assert_eq!(twice.registered_workers(), once.registered_workers());
        prop_assert_eq!(twice.len(), union.len());
    }
}
