//! Error types for promptlint-core.

use thiserror::Error;

/// Errors that can occur when loading or constructing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// A model profile was declared without a name.
    #[error("invalid configuration: model profile has an empty name")]
    EmptyModelName,

    /// Two model profiles share the same name.
    #[error("invalid configuration: duplicate model profile '{name}'")]
    DuplicateModel {
        /// The repeated model name.
        name: String,
    },

    /// A pricing value is negative or not a finite number.
    #[error("invalid configuration: model '{model}' has invalid {field} ({value})")]
    InvalidPricing {
        /// Model whose pricing block is invalid.
        model: String,
        /// The offending pricing field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A pricing block was declared with an empty currency code.
    #[error("invalid configuration: model '{model}' has an empty pricing currency")]
    EmptyCurrency {
        /// Model whose pricing block is invalid.
        model: String,
    },

    /// A global default is unusable.
    #[error("invalid configuration: defaults.{field} {reason}")]
    InvalidDefault {
        /// The offending defaults field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failure reported by a single rule.
///
/// The rule runner never propagates these; it turns them into a
/// low-severity `rule_error` issue and keeps going.
#[derive(Error, Debug)]
pub enum RuleError {
    /// The rule could not finish evaluating the prompt.
    #[error("rule '{rule}' failed: {reason}")]
    Failed {
        /// Code of the rule that failed.
        rule: &'static str,
        /// Human-readable failure reason.
        reason: String,
    },
}

/// Result type alias using [`RuleError`].
pub type RuleResult<T> = Result<T, RuleError>;

/// A severity label that is not one of `low`, `medium`, `high`, `critical`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown severity '{0}': expected low, medium, high, or critical")]
pub struct UnknownSeverity(pub String);
