//! Probability estimators with an attached confidence.
//!
//! An [`Estimator`] is an immutable value `e ∈ [0, 1]` bracketed by an
//! interval `[low, high]`. The interval width encodes uncertainty: a point
//! estimator (zero width) is fully confident, `[0, 1]` carries no
//! information at all.
//!
//! Estimators are produced by a [`ReputationSystem`](crate::ReputationSystem)
//! and only ever compared and inspected by consumers, never combined.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{EstimateError, EstimateResult};

/// Immutable probability-like value with an uncertainty interval.
///
/// # Invariants
///
/// `0 <= low <= estimate <= high <= 1`, all finite. Every constructor
/// (including deserialisation) enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEstimator", into = "RawEstimator")]
pub struct Estimator {
    estimate: f64,
    low: f64,
    high: f64,
}

/// Unvalidated wire form of an [`Estimator`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawEstimator {
    estimate: f64,
    low: f64,
    high: f64,
}

impl TryFrom<RawEstimator> for Estimator {
    type Error = EstimateError;

    fn try_from(raw: RawEstimator) -> EstimateResult<Self> {
        Estimator::with_bounds(raw.estimate, raw.low, raw.high)
    }
}

impl From<Estimator> for RawEstimator {
    fn from(e: Estimator) -> Self {
        RawEstimator {
            estimate: e.estimate,
            low: e.low,
            high: e.high,
        }
    }
}

fn check_unit(value: f64) -> EstimateResult<f64> {
    if !value.is_finite() {
        return Err(EstimateError::NotFinite(value));
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(EstimateError::OutOfRange(value));
    }
    Ok(value)
}

impl Estimator {
    /// A fully confident estimator (zero-width interval).
    pub fn point(value: f64) -> EstimateResult<Self> {
        let value = check_unit(value)?;
        Ok(Self {
            estimate: value,
            low: value,
            high: value,
        })
    }

    /// An estimator over `[low, high]` whose point estimate is the midpoint.
    pub fn interval(low: f64, high: f64) -> EstimateResult<Self> {
        let (low, high) = (check_unit(low)?, check_unit(high)?);
        if low > high {
            return Err(EstimateError::InvertedInterval { low, high });
        }
        Ok(Self {
            estimate: low + (high - low) / 2.0,
            low,
            high,
        })
    }

    /// An estimator with an explicit point estimate inside `[low, high]`.
    pub fn with_bounds(estimate: f64, low: f64, high: f64) -> EstimateResult<Self> {
        let (estimate, low, high) = (check_unit(estimate)?, check_unit(low)?, check_unit(high)?);
        if low > high {
            return Err(EstimateError::InvertedInterval { low, high });
        }
        if estimate < low || estimate > high {
            return Err(EstimateError::EstimateOutsideInterval {
                estimate,
                low,
                high,
            });
        }
        Ok(Self {
            estimate,
            low,
            high,
        })
    }

    /// A confident zero. What an optimistic reputation system reports.
    pub const fn zero() -> Self {
        Self {
            estimate: 0.0,
            low: 0.0,
            high: 0.0,
        }
    }

    /// Total ignorance: `[0, 1]` with midpoint `0.5`.
    pub const fn unknown() -> Self {
        Self {
            estimate: 0.5,
            low: 0.0,
            high: 1.0,
        }
    }

    pub fn estimate(&self) -> f64 {
        self.estimate
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Width of the uncertainty interval, in `[0, 1]`.
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// `1 - width`: 1.0 for a point estimator, 0.0 for [`Estimator::unknown`].
    pub fn confidence(&self) -> f64 {
        1.0 - self.width()
    }

    /// Whether the interval is narrow enough to trust the point estimate.
    pub fn is_confident(&self, min_confidence: f64) -> bool {
        self.confidence() >= min_confidence
    }

    /// Total order by point estimate; equal estimates put the more
    /// confident estimator first.
    pub fn cmp_by_estimate(&self, other: &Self) -> Ordering {
        self.estimate
            .total_cmp(&other.estimate)
            .then_with(|| other.confidence().total_cmp(&self.confidence()))
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.width() == 0.0 {
            write!(f, "{:.4}", self.estimate)
        } else {
            write!(
                f,
                "{:.4} [{:.4}, {:.4}]",
                self.estimate, self.low, self.high
            )
        }
    }
}
