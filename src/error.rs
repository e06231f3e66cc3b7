//! Error types.

use thiserror::Error;

/// Errors raised by lineup enumeration, rule parsing and diversification.
///
/// Solver infeasibility is not represented here: running out of distinct
/// feasible lineups ends enumeration normally.
#[derive(Debug, Error)]
pub enum LineupError {
    /// The configuration failed validation. Holds every problem found.
    #[error("invalid configuration: {}", .0.join("; "))]
    Config(Vec<String>),

    /// A required include names an entry that is not in the pool.
    #[error("included player not in pool: {0}")]
    UnknownInclude(String),

    /// A rule definition could not be parsed.
    #[error("malformed rule '{rule}': {reason}")]
    MalformedRule { rule: String, reason: String },

    /// A source cannot supply its diversification quota.
    #[error("quota {quota} for source '{source_key}' exceeds available {available}")]
    Shortfall {
        source_key: String,
        quota: usize,
        available: usize,
    },

    /// A solver assignment broke a roster or salary invariant.
    #[error("internal consistency violation: {0}")]
    Consistency(String),

    /// The solver rejected the model as malformed.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LineupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_joins_messages() {
        let err = LineupError::Config(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "invalid configuration: a; b");
    }

    #[test]
    fn test_malformed_rule_names_rule() {
        let err = LineupError::MalformedRule {
            rule: "stack_rule".into(),
            reason: "empty enforce".into(),
        };
        assert!(err.to_string().contains("stack_rule"));
    }
}
