//! Group values and growth states.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use collusion_state::WorkerId;

/// Index of a group in the grouper's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(usize);

impl GroupId {
    pub fn new(index: usize) -> Self {
        GroupId(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// A snapshot of a group of workers scheduled together.
///
/// The grouper owns the authoritative state; a `Group` handed out is a copy
/// taken under the group's lock. Groups are never empty and only grow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    owner: WorkerId,
    members: BTreeSet<WorkerId>,
}

impl Group {
    pub(crate) fn singleton(id: GroupId, owner: WorkerId) -> Self {
        let mut members = BTreeSet::new();
        members.insert(owner.clone());
        Self { id, owner, members }
    }

    /// Add a member. Returns `false` if it was already present.
    pub(crate) fn insert(&mut self, worker: WorkerId) -> bool {
        self.members.insert(worker)
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    /// The worker this group was created for.
    pub fn owner(&self) -> &WorkerId {
        &self.owner
    }

    pub fn members(&self) -> &BTreeSet<WorkerId> {
        &self.members
    }

    pub fn contains(&self, worker: &WorkerId) -> bool {
        self.members.contains(worker)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}

/// Where a worker's group stands relative to its current target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GrowthState {
    /// No group has been requested for the worker yet.
    Unassigned,
    /// Below the target computed at the last `get_group` call.
    Growing { size: usize, target: usize },
    /// At or above the target computed at the last `get_group` call.
    Stable { size: usize },
}

impl GrowthState {
    pub fn is_stable(self) -> bool {
        matches!(self, Self::Stable { .. })
    }
}
