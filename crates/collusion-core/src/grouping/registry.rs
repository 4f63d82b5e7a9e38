//! Keyed store of registered workers and their groups.
//!
//! Workers live in a sharded `DashMap` mapping each worker to the arena
//! index of its own group (or `None` while unassigned). Groups live in an
//! append-only arena of individually locked slots, so operations on
//! different groups never contend on a shared lock.
//!
//! Lock order: worker shard, then arena. A slot lock may be held while
//! reading the worker map, never the other way round.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};

use collusion_state::WorkerId;

use crate::error::{GroupingError, GroupingResult};
use crate::grouping::group::{Group, GroupId};

/// Authoritative state of one group.
#[derive(Debug)]
pub(crate) struct GroupSlot {
    pub(crate) group: Group,
    /// Target size computed at the last `get_group`; `None` until then.
    pub(crate) target: Option<usize>,
}

pub(crate) type SharedSlot = Arc<Mutex<GroupSlot>>;

#[derive(Debug, Default)]
pub(crate) struct GroupRegistry {
    workers: DashMap<WorkerId, Option<GroupId>>,
    arena: RwLock<Vec<SharedSlot>>,
}

impl GroupRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register workers; already-known workers keep their group.
    ///
    /// Returns the number of workers that were new.
    pub(crate) fn register(&self, workers: &[WorkerId]) -> usize {
        let mut added = 0;
        for worker in workers {
            self.workers.entry(worker.clone()).or_insert_with(|| {
                added += 1;
                None
            });
        }
        added
    }

    pub(crate) fn is_registered(&self, worker: &WorkerId) -> bool {
        self.workers.contains_key(worker)
    }

    pub(crate) fn len(&self) -> usize {
        self.workers.len()
    }

    /// All registered workers, sorted.
    pub(crate) fn workers(&self) -> Vec<WorkerId> {
        let mut out: Vec<WorkerId> = self.workers.iter().map(|e| e.key().clone()).collect();
        out.sort();
        out
    }

    pub(crate) fn slot(&self, id: GroupId) -> GroupingResult<SharedSlot> {
        self.arena
            .read()
            .get(id.index())
            .cloned()
            .ok_or(GroupingError::UnknownGroup(id))
    }

    /// The worker's group slot, if one has been created.
    pub(crate) fn slot_of(&self, worker: &WorkerId) -> GroupingResult<Option<SharedSlot>> {
        let assigned = *self
            .workers
            .get(worker)
            .ok_or_else(|| GroupingError::UnregisteredWorker(worker.clone()))?;
        assigned.map(|id| self.slot(id)).transpose()
    }

    /// The worker's group slot, creating a singleton group on first use.
    ///
    /// The boolean is `true` when this call created the group.
    pub(crate) fn slot_or_create(&self, worker: &WorkerId) -> GroupingResult<(SharedSlot, bool)> {
        let mut entry = self
            .workers
            .get_mut(worker)
            .ok_or_else(|| GroupingError::UnregisteredWorker(worker.clone()))?;

        if let Some(id) = *entry {
            drop(entry);
            return Ok((self.slot(id)?, false));
        }

        let mut arena = self.arena.write();
        let id = GroupId::new(arena.len());
        let slot = Arc::new(Mutex::new(GroupSlot {
            group: Group::singleton(id, worker.clone()),
            target: None,
        }));
        arena.push(Arc::clone(&slot));
        *entry = Some(id);
        Ok((slot, true))
    }
}
