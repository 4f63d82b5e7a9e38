//! Tunables for certification and grouping.
//!
//! Every struct carries production defaults (`Default`) and `with_*`
//! builders. [`CollusionConfig`] aggregates both components and can be read
//! from TOML; omitted fields keep their defaults.
//!
//! ```toml
//! [certifier]
//! likelihood_floor = 1e-6
//! require_separation = true
//!
//! [grouper]
//! negligible_fraction = 0.001
//! low_risk_upper_bound = 0.01
//! min_extension_confidence = 0.8
//! max_extension_likelihood = 0.5
//!
//! [grouper.sizing]
//! majority_risk = 0.05
//! max_group_size = 51
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use collusion_state::Estimator;

use crate::certification::score::DEFAULT_LIKELIHOOD_FLOOR;
use crate::error::ConfigError;
use crate::grouping::{GroupSizing, MAX_SUPPORTED_GROUP_SIZE};

/// Settings for [`CollusionAwareCertificator`](crate::CollusionAwareCertificator).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertifierConfig {
    /// Divisor floor for collusion likelihoods when scoring support.
    pub likelihood_floor: f64,
    /// Fail when the best class cannot be separated from the runner-up
    /// within the estimators' uncertainty.
    pub require_separation: bool,
}

impl Default for CertifierConfig {
    fn default() -> Self {
        Self {
            likelihood_floor: DEFAULT_LIKELIHOOD_FLOOR,
            require_separation: true,
        }
    }
}

impl CertifierConfig {
    pub fn with_likelihood_floor(mut self, floor: f64) -> Self {
        self.likelihood_floor = floor;
        self
    }

    pub fn with_require_separation(mut self, require: bool) -> Self {
        self.require_separation = require;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.likelihood_floor > 0.0 && self.likelihood_floor < 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "certifier.likelihood_floor",
                reason: format!("{} is not in (0, 1)", self.likelihood_floor),
            });
        }
        Ok(())
    }
}

/// Settings for [`GreedyGracefulGrouper`](crate::GreedyGracefulGrouper).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrouperConfig {
    /// Fraction point estimates at or below this are negligible.
    pub negligible_fraction: f64,
    /// Fraction estimators whose upper bound is below this are negligible.
    pub low_risk_upper_bound: f64,
    /// Minimum estimator confidence for a pairwise estimate to count.
    pub min_extension_confidence: f64,
    /// Candidates estimated above this are never added.
    pub max_extension_likelihood: f64,
    pub sizing: GroupSizing,
}

impl Default for GrouperConfig {
    fn default() -> Self {
        Self {
            negligible_fraction: 1e-3,
            low_risk_upper_bound: 0.01,
            min_extension_confidence: 0.8,
            max_extension_likelihood: 0.5,
            sizing: GroupSizing::default(),
        }
    }
}

impl GrouperConfig {
    pub fn with_min_extension_confidence(mut self, confidence: f64) -> Self {
        self.min_extension_confidence = confidence;
        self
    }

    pub fn with_max_extension_likelihood(mut self, likelihood: f64) -> Self {
        self.max_extension_likelihood = likelihood;
        self
    }

    pub fn with_sizing(mut self, sizing: GroupSizing) -> Self {
        self.sizing = sizing;
        self
    }

    /// Whether a colluders-fraction estimate demonstrates no real risk.
    pub fn is_negligible(&self, fraction: &Estimator) -> bool {
        fraction.estimate() <= self.negligible_fraction
            || fraction.high() < self.low_risk_upper_bound
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit_fields = [
            ("grouper.negligible_fraction", self.negligible_fraction),
            ("grouper.low_risk_upper_bound", self.low_risk_upper_bound),
            (
                "grouper.min_extension_confidence",
                self.min_extension_confidence,
            ),
            (
                "grouper.max_extension_likelihood",
                self.max_extension_likelihood,
            ),
            ("grouper.sizing.majority_risk", self.sizing.majority_risk),
        ];
        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("{value} is not in [0, 1]"),
                });
            }
        }
        if !(1..=MAX_SUPPORTED_GROUP_SIZE).contains(&self.sizing.max_group_size) {
            return Err(ConfigError::InvalidValue {
                field: "grouper.sizing.max_group_size",
                reason: format!(
                    "{} is not in [1, {}]",
                    self.sizing.max_group_size, MAX_SUPPORTED_GROUP_SIZE
                ),
            });
        }
        Ok(())
    }
}

/// Configuration for both components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollusionConfig {
    pub certifier: CertifierConfig,
    pub grouper: GrouperConfig,
}

impl CollusionConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: CollusionConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read collusion config {:?}", path))?;
        Self::from_toml_str(&content).with_context(|| format!("parse collusion config {:?}", path))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.certifier.validate()?;
        self.grouper.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(CollusionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = CollusionConfig::from_toml_str("").unwrap();
        assert_eq!(config, CollusionConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = CollusionConfig::from_toml_str(
            r#"
            [grouper]
            min_extension_confidence = 0.9

            [grouper.sizing]
            max_group_size = 21
            "#,
        )
        .unwrap();
        assert_eq!(config.grouper.min_extension_confidence, 0.9);
        assert_eq!(config.grouper.sizing.max_group_size, 21);
        assert_eq!(config.grouper.sizing.majority_risk, 0.05);
        assert_eq!(config.certifier, CertifierConfig::default());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let err = CollusionConfig::from_toml_str(
            r#"
            [grouper]
            max_extension_likelihood = 1.5
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("max_extension_likelihood"));

        let err = CollusionConfig::from_toml_str(
            r#"
            [certifier]
            likelihood_floor = 0.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_rejects_group_size_beyond_supported() {
        let err = CollusionConfig::from_toml_str(
            r#"
            [grouper.sizing]
            max_group_size = 5001
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "grouper.sizing.max_group_size",
                ..
            }
        ));

        let at_cap = format!(
            "[grouper.sizing]\nmax_group_size = {}\n",
            MAX_SUPPORTED_GROUP_SIZE
        );
        assert!(CollusionConfig::from_toml_str(&at_cap).is_ok());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = CollusionConfig::from_toml_str("[grouper\nfoo=").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_negligible_fraction() {
        let config = GrouperConfig::default();
        assert!(config.is_negligible(&Estimator::zero()));
        assert!(config.is_negligible(&Estimator::interval(0.0, 0.005).unwrap()));
        assert!(!config.is_negligible(&Estimator::with_bounds(0.31, 0.21, 0.41).unwrap()));
        assert!(!config.is_negligible(&Estimator::unknown()));
    }

    #[test]
    fn test_builders() {
        let config = GrouperConfig::default()
            .with_min_extension_confidence(0.5)
            .with_max_extension_likelihood(0.2);
        assert_eq!(config.min_extension_confidence, 0.5);
        assert_eq!(config.max_extension_likelihood, 0.2);

        let certifier = CertifierConfig::default().with_require_separation(false);
        assert!(!certifier.require_separation);
    }
}
