//! Incremental "greedy / graceful" worker grouping.
//!
//! Each registered worker owns one group, created as a singleton the first
//! time the group is requested. Every `get_group` call recomputes the
//! target size from the reputation system's colluders-fraction estimate
//! and, when the group is below target, grows it by at most one member:
//!
//! ```text
//! unassigned ──get_group──▶ growing ──get_group──▶ … ──▶ stable
//!                 (size < target)          (size >= target)
//! ```
//!
//! - **graceful**: negligible colluders fraction, target 1, no redundancy
//! - **greedy**: target `min_size(fraction)`, grown toward it one member
//!   per call using the least-suspect confident candidate
//!
//! Groups never shrink. Reputation failures degrade to "do not grow".

use std::sync::Arc;

use tracing::warn;

use collusion_state::{ReputationSystem, WorkerId};

use crate::config::GrouperConfig;
use crate::error::{GroupingError, GroupingResult};
use crate::grouping::extension::select_extension;
use crate::grouping::group::{Group, GrowthState};
use crate::grouping::registry::{GroupRegistry, GroupSlot};
use crate::metrics::METRICS;
use crate::obs::{
    emit_extension_skipped, emit_group_created, emit_group_extended, emit_workers_registered,
};

/// Groups workers for redundant execution.
pub trait ResourcesGrouper: Send + Sync {
    /// Register workers as eligible for grouping. Idempotent.
    fn add_all_workers(&self, workers: &[WorkerId]);

    /// The worker's current group, advanced by at most one step.
    ///
    /// Fails only if `worker` was never registered.
    fn get_group(&self, worker: &WorkerId) -> GroupingResult<Group>;

    /// Try to grow `group` by one member; returns the resulting group.
    ///
    /// Unlike `get_group`, this does not consult the target size: an
    /// explicit extension may take a group past the size the current
    /// colluders fraction calls for. An unchanged group means no qualifying
    /// candidate exists right now.
    ///
    /// Fails with `UnknownGroup` if `group` was not handed out by this
    /// grouper.
    fn get_group_extension(&self, group: &Group) -> GroupingResult<Group>;
}

/// Grouper that stays graceful until collusion risk is demonstrated.
pub struct GreedyGracefulGrouper {
    reputation: Arc<dyn ReputationSystem>,
    config: GrouperConfig,
    registry: GroupRegistry,
}

impl GreedyGracefulGrouper {
    pub fn new(reputation: Arc<dyn ReputationSystem>) -> Self {
        Self::with_config(reputation, GrouperConfig::default())
    }

    pub fn with_config(reputation: Arc<dyn ReputationSystem>, config: GrouperConfig) -> Self {
        Self {
            reputation,
            config,
            registry: GroupRegistry::new(),
        }
    }

    pub fn config(&self) -> &GrouperConfig {
        &self.config
    }

    pub fn is_registered(&self, worker: &WorkerId) -> bool {
        self.registry.is_registered(worker)
    }

    /// All registered workers, sorted.
    pub fn registered_workers(&self) -> Vec<WorkerId> {
        self.registry.workers()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// The worker's current group without advancing it.
    pub fn peek_group(&self, worker: &WorkerId) -> GroupingResult<Option<Group>> {
        Ok(self
            .registry
            .slot_of(worker)?
            .map(|slot| slot.lock().group.clone()))
    }

    /// Where the worker's group stands relative to its last computed target.
    pub fn growth_state(&self, worker: &WorkerId) -> GroupingResult<GrowthState> {
        let Some(slot) = self.registry.slot_of(worker)? else {
            return Ok(GrowthState::Unassigned);
        };
        let slot = slot.lock();
        let size = slot.group.len();
        Ok(match slot.target {
            Some(target) if size < target => GrowthState::Growing { size, target },
            _ => GrowthState::Stable { size },
        })
    }

    /// Call `get_group` until the group size stops changing, at most
    /// `max_steps` times. Always takes at least one step, so a budget of 0
    /// behaves like 1.
    pub fn stabilize(&self, worker: &WorkerId, max_steps: usize) -> GroupingResult<Group> {
        let steps = max_steps.max(1);
        let mut group = self.get_group(worker)?;
        for _ in 1..steps {
            let next = self.get_group(worker)?;
            if next.len() == group.len() {
                return Ok(next);
            }
            group = next;
        }
        Ok(group)
    }

    /// Current target size; 1 in graceful mode or when the fraction is
    /// unavailable.
    fn target_size(&self) -> usize {
        match self.reputation.colluders_fraction() {
            Ok(fraction) if self.config.is_negligible(&fraction) => 1,
            Ok(fraction) => self.config.sizing.target_size(&fraction),
            Err(e) => {
                warn!(event = "grouping.fraction_unavailable", error = %e);
                1
            }
        }
    }

    /// One extension step on a locked slot. Returns whether a member joined.
    fn extend_locked(&self, slot: &mut GroupSlot) -> bool {
        let group_id = slot.group.id();
        let candidates: Vec<WorkerId> = self
            .registry
            .workers()
            .into_iter()
            .filter(|w| !slot.group.contains(w))
            .collect();

        if candidates.is_empty() {
            METRICS.inc_extensions_skipped();
            emit_extension_skipped(group_id, "no candidates");
            return false;
        }

        let estimates = match self
            .reputation
            .pairwise_collusion_likelihood(slot.group.members(), &candidates)
        {
            Ok(estimates) => estimates,
            Err(e) => {
                warn!(event = "grouping.pairwise_unavailable", group = %group_id, error = %e);
                METRICS.inc_extensions_skipped();
                emit_extension_skipped(group_id, "pairwise estimates unavailable");
                return false;
            }
        };

        match select_extension(&candidates, &estimates, &self.config) {
            Some(choice) => {
                slot.group.insert(choice.worker.clone());
                METRICS.inc_extensions_applied();
                emit_group_extended(
                    group_id,
                    &choice.worker,
                    choice.likelihood.estimate(),
                    slot.group.len(),
                );
                true
            }
            None => {
                METRICS.inc_extensions_skipped();
                emit_extension_skipped(group_id, "no confident low-risk candidate");
                false
            }
        }
    }
}

impl ResourcesGrouper for GreedyGracefulGrouper {
    fn add_all_workers(&self, workers: &[WorkerId]) {
        let added = self.registry.register(workers);
        emit_workers_registered(added, self.registry.len());
    }

    fn get_group(&self, worker: &WorkerId) -> GroupingResult<Group> {
        let (slot, created) = self.registry.slot_or_create(worker)?;
        let mut slot = slot.lock();
        if created {
            METRICS.inc_groups_created();
            emit_group_created(slot.group.id(), worker);
        }

        let target = self.target_size();
        slot.target = Some(target);
        if slot.group.len() < target {
            self.extend_locked(&mut slot);
        }
        Ok(slot.group.clone())
    }

    fn get_group_extension(&self, group: &Group) -> GroupingResult<Group> {
        let slot = self.registry.slot(group.id())?;
        let mut slot = slot.lock();
        if slot.group.owner() != group.owner() {
            return Err(GroupingError::UnknownGroup(group.id()));
        }
        self.extend_locked(&mut slot);
        Ok(slot.group.clone())
    }
}
