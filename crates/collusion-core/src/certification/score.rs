//! Collusion-adjusted support scores.
//!
//! Model: honest workers agree on the correct result, colluders agree on a
//! fabricated one. A class of `n` agreeing workers whose joint collusion
//! likelihood is `p` gets the score
//!
//! ```text
//! support(n, p) = n * (1 - p) / max(p, floor)
//! ```
//!
//! i.e. the odds that the class is the honest one, weighted by its raw
//! agreement size. Equal likelihoods reduce to plain majority vote; a
//! suspected block loses to a clean minority even when it is larger.

use serde::{Deserialize, Serialize};

use collusion_state::Estimator;

/// Smallest likelihood used as a divisor, so a confident zero stays finite.
pub const DEFAULT_LIKELIHOOD_FLOOR: f64 = 1e-6;

/// A class's support score plus the interval induced by its estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportScore {
    /// Score at the estimator's point estimate.
    pub score: f64,
    /// Score at the estimator's upper likelihood bound.
    pub low: f64,
    /// Score at the estimator's lower likelihood bound.
    pub high: f64,
}

impl SupportScore {
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Whether the two score intervals share any point.
    pub fn overlaps(&self, other: &SupportScore) -> bool {
        self.low <= other.high && other.low <= self.high
    }
}

fn odds(size: usize, likelihood: f64, floor: f64) -> f64 {
    size as f64 * (1.0 - likelihood) / likelihood.max(floor)
}

/// Support score for a class of `size` agreeing workers.
///
/// Strictly decreasing in the likelihood estimate and non-decreasing in
/// `size`.
pub fn adjusted_support(size: usize, likelihood: &Estimator, floor: f64) -> SupportScore {
    SupportScore {
        score: odds(size, likelihood.estimate(), floor),
        low: odds(size, likelihood.high(), floor),
        high: odds(size, likelihood.low(), floor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(p: f64) -> Estimator {
        Estimator::point(p).unwrap()
    }

    #[test]
    fn test_equal_likelihood_is_majority_vote() {
        let small = adjusted_support(4, &point(0.1), DEFAULT_LIKELIHOOD_FLOOR);
        let large = adjusted_support(6, &point(0.1), DEFAULT_LIKELIHOOD_FLOOR);
        assert!(large.score > small.score);
    }

    #[test]
    fn test_suspected_majority_loses_to_clean_minority() {
        let minority = adjusted_support(4, &point(0.01), DEFAULT_LIKELIHOOD_FLOOR);
        let majority = adjusted_support(6, &point(0.5), DEFAULT_LIKELIHOOD_FLOOR);
        assert!(minority.score > majority.score);
    }

    #[test]
    fn test_zero_likelihood_is_finite() {
        let s = adjusted_support(3, &Estimator::zero(), DEFAULT_LIKELIHOOD_FLOOR);
        assert!(s.score.is_finite());
        assert_eq!(s.width(), 0.0);
    }

    #[test]
    fn test_certain_collusion_scores_zero() {
        let s = adjusted_support(10, &point(1.0), DEFAULT_LIKELIHOOD_FLOOR);
        assert_eq!(s.score, 0.0);
    }

    #[test]
    fn test_interval_brackets_score() {
        let e = Estimator::with_bounds(0.2, 0.1, 0.4).unwrap();
        let s = adjusted_support(5, &e, DEFAULT_LIKELIHOOD_FLOOR);
        assert!(s.low <= s.score && s.score <= s.high);
        assert!(s.width() > 0.0);
    }

    #[test]
    fn test_overlap() {
        let a = SupportScore {
            score: 2.0,
            low: 1.0,
            high: 3.0,
        };
        let b = SupportScore {
            score: 4.0,
            low: 2.5,
            high: 5.0,
        };
        let c = SupportScore {
            score: 9.0,
            low: 8.0,
            high: 10.0,
        };
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }
}
