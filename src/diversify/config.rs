//! Diversification selector configuration.

use crate::error::{LineupError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for [`DiversitySelector`](super::DiversitySelector).
///
/// # Examples
///
/// ```
/// use u_lineup::diversify::SelectConfig;
///
/// let config = SelectConfig::default()
///     .with_quota("main", 20)
///     .with_quota("contrarian", 5)
///     .with_seed(7);
/// assert_eq!(config.total_quota(), 25);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectConfig {
    /// Number of records to draw per source. Sources absent here are ignored.
    pub quotas: BTreeMap<String, usize>,

    /// Proceed with partial fulfilment when a source has fewer candidates
    /// than its quota. Off by default: a shortfall is an error.
    pub allow_shortfall: bool,

    /// Seeds the secondary tie-break order. `None` keeps input order.
    pub seed: Option<u64>,

    /// Score candidates on the rayon pool (needs the `parallel` feature).
    pub parallel: bool,
}

impl SelectConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Adds `n` to the quota of `source`.
    pub fn with_quota(mut self, source: impl Into<String>, n: usize) -> Self {
        *self.quotas.entry(source.into()).or_insert(0) += n;
        self
    }

    pub fn with_allow_shortfall(mut self, allow: bool) -> Self {
        self.allow_shortfall = allow;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn total_quota(&self) -> usize {
        self.quotas.values().sum()
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.quotas.is_empty() {
            errors.push("at least one source quota is required".to_string());
        }
        if self.quotas.keys().any(|k| k.trim().is_empty()) {
            errors.push("source keys must not be empty".to_string());
        }
        if !self.quotas.is_empty() && self.total_quota() == 0 {
            errors.push("quotas must select at least one record".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(LineupError::Config(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotas_accumulate() {
        let config = SelectConfig::default().with_quota("a", 2).with_quota("a", 3);
        assert_eq!(config.quotas.get("a"), Some(&5));
    }

    #[test]
    fn test_empty_quotas_invalid() {
        assert!(SelectConfig::default().validate().is_err());
        assert!(SelectConfig::default().with_quota("a", 0).validate().is_err());
        assert!(SelectConfig::default().with_quota(" ", 1).validate().is_err());
    }

    #[test]
    fn test_from_yaml() {
        let config = SelectConfig::from_yaml_str(
            "quotas:\n  main: 3\n  alt: 1\nallow_shortfall: true\nseed: 11\n",
        )
        .unwrap();
        assert_eq!(config.total_quota(), 4);
        assert!(config.allow_shortfall);
        assert_eq!(config.seed, Some(11));
    }
}
