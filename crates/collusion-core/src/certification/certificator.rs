//! Collusion-aware result certification.
//!
//! Submissions are partitioned into agreement classes (workers that
//! returned an identical result). Each class is scored by its size and the
//! reputation system's joint collusion likelihood for its exact worker set
//! (see [`score`](super::score)); the best-scoring class's result is
//! certified.
//!
//! Ranking (best first): support score, then confidence of the class's
//! likelihood estimator, then class size, then earliest submission.
//!
//! Certification fails instead of guessing when there is no redundancy,
//! when a reputation query fails, or when the best class cannot be
//! separated from the runner-up within the estimators' uncertainty.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use collusion_state::{Estimator, ReputationSystem, WorkerId};

use crate::certification::score::{adjusted_support, SupportScore};
use crate::classes::partition_by_equality;
use crate::config::CertifierConfig;
use crate::error::{CertificationError, CertificationResult};
use crate::metrics::METRICS;
use crate::obs::{emit_certification_failed, emit_certified, CertificationSpan};

/// Fewest submissions that can be cross-checked against each other.
pub const MIN_SUBMISSIONS: usize = 2;

/// Picks the trustworthy result among redundant submissions.
pub trait ResultCertificator<R>: Send + Sync {
    /// `workers[i]` submitted `results[i]`.
    fn select_best_result(&self, workers: &[WorkerId], results: &[R]) -> CertificationResult<R>;
}

/// Workers that submitted one identical result, with their score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgreementClass<R> {
    pub result: R,
    /// Members in submission order.
    pub workers: Vec<WorkerId>,
    /// Position of the class's first submission.
    pub first_index: usize,
    /// Joint collusion likelihood of exactly these workers.
    pub likelihood: Estimator,
    pub support: SupportScore,
}

impl<R> AgreementClass<R> {
    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

/// Full outcome of a successful certification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Certification<R> {
    pub result: R,
    /// Index of the winning class in `classes`.
    pub winner: usize,
    /// Classes in order of first submission.
    pub classes: Vec<AgreementClass<R>>,
}

impl<R> Certification<R> {
    pub fn winning_class(&self) -> &AgreementClass<R> {
        &self.classes[self.winner]
    }

    pub fn is_unanimous(&self) -> bool {
        self.classes.len() == 1
    }
}

/// Certificator that discounts agreement among suspected colluders.
pub struct CollusionAwareCertificator {
    reputation: Arc<dyn ReputationSystem>,
    config: CertifierConfig,
}

impl CollusionAwareCertificator {
    pub fn new(reputation: Arc<dyn ReputationSystem>) -> Self {
        Self::with_config(reputation, CertifierConfig::default())
    }

    pub fn with_config(reputation: Arc<dyn ReputationSystem>, config: CertifierConfig) -> Self {
        Self { reputation, config }
    }

    pub fn config(&self) -> &CertifierConfig {
        &self.config
    }

    /// Certify a submission set and report how every class scored.
    pub fn certify<R>(
        &self,
        workers: &[WorkerId],
        results: &[R],
    ) -> CertificationResult<Certification<R>>
    where
        R: Eq + Hash + Clone,
    {
        let _span = CertificationSpan::enter(workers.len());
        let outcome = self.evaluate(workers, results);
        match &outcome {
            Ok(cert) => {
                METRICS.inc_certified();
                let winner = cert.winning_class();
                emit_certified(cert.classes.len(), winner.size(), winner.support.score);
            }
            Err(e) => {
                METRICS.inc_certification_failed();
                emit_certification_failed(e);
            }
        }
        outcome
    }

    fn evaluate<R>(
        &self,
        workers: &[WorkerId],
        results: &[R],
    ) -> CertificationResult<Certification<R>>
    where
        R: Eq + Hash + Clone,
    {
        if workers.len() != results.len() {
            return Err(CertificationError::LengthMismatch {
                workers: workers.len(),
                results: results.len(),
            });
        }
        if workers.len() < MIN_SUBMISSIONS {
            return Err(CertificationError::InsufficientRedundancy {
                submitted: workers.len(),
                required: MIN_SUBMISSIONS,
            });
        }
        let mut seen = HashSet::with_capacity(workers.len());
        for w in workers {
            if !seen.insert(w) {
                return Err(CertificationError::DuplicateWorker(w.clone()));
            }
        }

        let mut classes = Vec::new();
        for indices in partition_by_equality(results) {
            let members: Vec<WorkerId> = indices.iter().map(|&i| workers[i].clone()).collect();
            let set: BTreeSet<WorkerId> = members.iter().cloned().collect();
            let likelihood = self.reputation.joint_collusion_likelihood(&set)?;
            let support =
                adjusted_support(members.len(), &likelihood, self.config.likelihood_floor);
            debug!(
                event = "certification.class_scored",
                size = members.len(),
                likelihood = %likelihood,
                score = support.score,
            );
            classes.push(AgreementClass {
                result: results[indices[0]].clone(),
                workers: members,
                first_index: indices[0],
                likelihood,
                support,
            });
        }

        let mut ranking: Vec<usize> = (0..classes.len()).collect();
        ranking.sort_by(|&a, &b| rank(&classes[a], &classes[b]));
        let winner = ranking[0];

        if self.config.require_separation {
            if let Some(&rival) = ranking.get(1) {
                let (best, other) = (&classes[winner].support, &classes[rival].support);
                let uncertain = best.width() > 0.0 || other.width() > 0.0;
                if uncertain && best.overlaps(other) {
                    return Err(CertificationError::Indistinguishable {
                        best_low: best.low,
                        best_high: best.high,
                        rival_low: other.low,
                        rival_high: other.high,
                    });
                }
            }
        }

        Ok(Certification {
            result: classes[winner].result.clone(),
            winner,
            classes,
        })
    }
}

/// Best class first.
fn rank<R>(a: &AgreementClass<R>, b: &AgreementClass<R>) -> Ordering {
    b.support
        .score
        .total_cmp(&a.support.score)
        .then_with(|| {
            b.likelihood
                .confidence()
                .total_cmp(&a.likelihood.confidence())
        })
        .then_with(|| b.size().cmp(&a.size()))
        .then_with(|| a.first_index.cmp(&b.first_index))
}

impl<R> ResultCertificator<R> for CollusionAwareCertificator
where
    R: Eq + Hash + Clone,
{
    fn select_best_result(&self, workers: &[WorkerId], results: &[R]) -> CertificationResult<R> {
        self.certify(workers, results).map(|cert| cert.result)
    }
}
