//! Structured observability hooks for certification and grouping.
//!
//! This module provides:
//! - A certification-scoped tracing span via the `CertificationSpan` RAII guard
//! - Emission functions for key events: certified, certification failed,
//!   workers registered, group created, group extended, extension skipped
//!
//! Events are emitted at `info!` level except failures and skips, which
//! are `warn!` and `debug!` respectively.

use tracing::{debug, info, warn};

use collusion_state::WorkerId;

use crate::grouping::GroupId;

/// RAII guard that enters a span for the duration of one certification.
pub struct CertificationSpan {
    _span: tracing::span::EnteredSpan,
}

impl CertificationSpan {
    pub fn enter(submissions: usize) -> Self {
        let span = tracing::info_span!("collusion.certify", submissions = submissions);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: a result was certified.
pub fn emit_certified(classes: usize, winner_size: usize, score: f64) {
    info!(
        event = "certification.certified",
        classes = classes,
        winner_size = winner_size,
        score = score,
    );
}

/// Emit event: certification failed (warning level).
pub fn emit_certification_failed(error: &dyn std::fmt::Display) {
    warn!(event = "certification.failed", error = %error);
}

/// Emit event: workers were added to the grouper's registry.
pub fn emit_workers_registered(added: usize, total: usize) {
    info!(event = "grouping.workers_registered", added = added, total = total);
}

/// Emit event: a singleton group was created for a worker.
pub fn emit_group_created(group: GroupId, owner: &WorkerId) {
    info!(event = "grouping.group_created", group = %group, owner = %owner);
}

/// Emit event: a group grew by one member.
pub fn emit_group_extended(group: GroupId, added: &WorkerId, likelihood: f64, size: usize) {
    info!(
        event = "grouping.group_extended",
        group = %group,
        added = %added,
        likelihood = likelihood,
        size = size,
    );
}

/// Emit event: an extension attempt left the group unchanged.
pub fn emit_extension_skipped(group: GroupId, reason: &str) {
    debug!(event = "grouping.extension_skipped", group = %group, reason = %reason);
}
