//! Target group size as a function of the colluders fraction.
//!
//! A group of `n` workers drawn from a population where a fraction `f`
//! colludes contains `Binomial(n, f)` colluders. The target size is the
//! smallest odd `n` for which a colluding strict majority is no more likely
//! than `majority_risk`, capped at `max_group_size`.
//!
//! With the defaults (`0.05`, `51`):
//!
//! | f     | size |
//! |-------|------|
//! | 0.00  | 1    |
//! | 0.10  | 3    |
//! | 0.20  | 7    |
//! | 0.31  | 17   |
//! | ≥0.5  | 51   |

use serde::{Deserialize, Serialize};

use collusion_state::Estimator;

/// Acceptable probability that colluders form a strict majority of a group.
pub const DEFAULT_MAJORITY_RISK: f64 = 0.05;

/// Upper bound on any target size.
pub const DEFAULT_MAX_GROUP_SIZE: usize = 51;

/// Largest `max_group_size` the binomial tail stays finite for: beyond it
/// `(1 - f)^n` underflows near `f = 0.5` and the tail reads as zero.
pub const MAX_SUPPORTED_GROUP_SIZE: usize = 1001;

/// Parameters of the group-size function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSizing {
    pub majority_risk: f64,
    pub max_group_size: usize,
}

impl Default for GroupSizing {
    fn default() -> Self {
        Self {
            majority_risk: DEFAULT_MAJORITY_RISK,
            max_group_size: DEFAULT_MAX_GROUP_SIZE,
        }
    }
}

impl GroupSizing {
    /// Smallest odd group size keeping a colluding majority within risk.
    ///
    /// Non-decreasing in `fraction`; `1` for `fraction <= 0` (and NaN),
    /// `max_group_size` for `fraction >= 0.5` where no size suffices.
    pub fn min_size(&self, fraction: f64) -> usize {
        let cap = self.max_group_size.max(1);
        if fraction.is_nan() || fraction <= 0.0 {
            return 1;
        }
        if fraction >= 0.5 {
            return cap;
        }

        let mut n = 1;
        while n < cap {
            if colluding_majority_probability(n, fraction) <= self.majority_risk {
                return n;
            }
            n += 2;
        }
        cap
    }

    /// Target size for an estimated fraction, using its point estimate.
    pub fn target_size(&self, fraction: &Estimator) -> usize {
        self.min_size(fraction.estimate())
    }
}

/// Target group size under the default sizing parameters.
///
/// Pure: the same fraction always yields the same size.
pub fn min_size(fraction: f64) -> usize {
    GroupSizing::default().min_size(fraction)
}

/// `P[Binomial(n, f) > n / 2]`: the chance colluders hold a strict majority.
pub fn colluding_majority_probability(n: usize, fraction: f64) -> f64 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let ratio = fraction / (1.0 - fraction);
    let majority = n / 2 + 1;
    let mut pmf = (1.0 - fraction).powi(n as i32);
    let mut tail = 0.0;
    for k in 0..=n {
        if k >= majority {
            tail += pmf;
        }
        pmf *= (n - k) as f64 / (k + 1) as f64 * ratio;
    }
    tail.min(1.0)
}
