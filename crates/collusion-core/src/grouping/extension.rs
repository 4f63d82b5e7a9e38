//! Candidate selection for growing a group by one member.

use std::collections::HashMap;

use collusion_state::{Estimator, WorkerId};

use crate::config::GrouperConfig;

/// The candidate chosen to join a group.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionChoice {
    pub worker: WorkerId,
    pub likelihood: Estimator,
}

/// Pick the candidate least likely to collude with the group.
///
/// A candidate qualifies only when its pairwise estimator is confident
/// (`min_extension_confidence`) and its estimate does not exceed
/// `max_extension_likelihood`. Candidates missing from `estimates` never
/// qualify. Among qualifiers the lowest estimate wins, then the higher
/// confidence, then the smaller worker id.
pub fn select_extension(
    candidates: &[WorkerId],
    estimates: &HashMap<WorkerId, Estimator>,
    config: &GrouperConfig,
) -> Option<ExtensionChoice> {
    candidates
        .iter()
        .filter_map(|w| estimates.get(w).map(|e| (w, *e)))
        .filter(|(_, e)| {
            e.is_confident(config.min_extension_confidence)
                && e.estimate() <= config.max_extension_likelihood
        })
        .min_by(|(wa, ea), (wb, eb)| ea.cmp_by_estimate(eb).then_with(|| wa.cmp(wb)))
        .map(|(worker, likelihood)| ExtensionChoice {
            worker: worker.clone(),
            likelihood,
        })
}
