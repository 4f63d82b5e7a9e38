//! Global atomic counters for certification and grouping.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. on a scheduler tick).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lock-free atomic counters.
pub struct Metrics {
    certifications_succeeded: AtomicU64,
    certifications_failed: AtomicU64,
    groups_created: AtomicU64,
    extensions_applied: AtomicU64,
    extensions_skipped: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            certifications_succeeded: AtomicU64::new(0),
            certifications_failed: AtomicU64::new(0),
            groups_created: AtomicU64::new(0),
            extensions_applied: AtomicU64::new(0),
            extensions_skipped: AtomicU64::new(0),
        }
    }

    /// Increment the certifications-succeeded counter by one.
    pub fn inc_certified(&self) {
        self.certifications_succeeded.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "certifications_succeeded", "counter incremented");
    }

    /// Increment the certifications-failed counter by one.
    pub fn inc_certification_failed(&self) {
        self.certifications_failed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "certifications_failed", "counter incremented");
    }

    /// Increment the groups-created counter by one.
    pub fn inc_groups_created(&self) {
        self.groups_created.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "groups_created", "counter incremented");
    }

    /// Increment the extensions-applied counter by one.
    pub fn inc_extensions_applied(&self) {
        self.extensions_applied.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "extensions_applied", "counter incremented");
    }

    /// Increment the extensions-skipped counter by one.
    pub fn inc_extensions_skipped(&self) {
        self.extensions_skipped.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "extensions_skipped", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    ///
    /// Call at natural boundaries (a scheduler tick, a batch of
    /// certifications) rather than on every increment.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            certifications_succeeded = self.certifications_succeeded(),
            certifications_failed = self.certifications_failed(),
            groups_created = self.groups_created(),
            extensions_applied = self.extensions_applied(),
            extensions_skipped = self.extensions_skipped(),
        );
    }

    /// Read the current certifications-succeeded count.
    pub fn certifications_succeeded(&self) -> u64 {
        self.certifications_succeeded.load(Ordering::Relaxed)
    }

    /// Read the current certifications-failed count.
    pub fn certifications_failed(&self) -> u64 {
        self.certifications_failed.load(Ordering::Relaxed)
    }

    /// Read the current groups-created count.
    pub fn groups_created(&self) -> u64 {
        self.groups_created.load(Ordering::Relaxed)
    }

    /// Read the current extensions-applied count.
    pub fn extensions_applied(&self) -> u64 {
        self.extensions_applied.load(Ordering::Relaxed)
    }

    /// Read the current extensions-skipped count.
    pub fn extensions_skipped(&self) -> u64 {
        self.extensions_skipped.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.certifications_succeeded.store(0, Ordering::Relaxed);
        self.certifications_failed.store(0, Ordering::Relaxed);
        self.groups_created.store(0, Ordering::Relaxed);
        self.extensions_applied.store(0, Ordering::Relaxed);
        self.extensions_skipped.store(0, Ordering::Relaxed);
    }
}
