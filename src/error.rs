//! Error types for the Port Tariff Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while pricing a port call.

use thiserror::Error;

/// The main error type for the Port Tariff Engine.
///
/// Every calculator returns this error type. Errors are never swallowed or
/// replaced by a zero amount: a failing input aborts the whole evaluation.
///
/// # Example
///
/// ```
/// use port_tariff_engine::error::EngineError;
///
/// let error = EngineError::UnknownSchedule {
///     regime: "tanger_med".to_string(),
///     key: "cruise".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unknown schedule key 'cruise' for regime 'tanger_med'");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A loaded schedule violates a structural rule (unsorted brackets, gaps...).
    #[error("Invalid schedule '{table}': {message}")]
    InvalidSchedule {
        /// The table that failed validation.
        table: String,
        /// What is wrong with it.
        message: String,
    },

    /// An input value is out of its domain.
    ///
    /// Covers non-positive dimensions, non-positive currency rates and flag
    /// combinations a regime does not define.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A terminal, category, product or movement key is not part of the regime's schedule.
    #[error("Unknown schedule key '{key}' for regime '{regime}'")]
    UnknownSchedule {
        /// The regime that was queried.
        regime: String,
        /// The key that was not found.
        key: String,
    },

    /// A size metric landed where the tier table has no rate and no extrapolation rule.
    #[error("No bracket resolves metric {metric} in table '{table}'")]
    UnresolvedBracket {
        /// The table that was queried.
        table: String,
        /// The metric that could not be resolved.
        metric: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::UnknownSchedule`].
    pub fn unknown_schedule(regime: impl Into<String>, key: impl Into<String>) -> Self {
        EngineError::UnknownSchedule {
            regime: regime.into(),
            key: key.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
