//! Crate error type.
//!
//! Only contract violations and configuration problems are errors. A
//! sequence that misses its progress, durability, CP, trick or reliability
//! targets is a normal simulation outcome and is reported through
//! [`Feasibility`](crate::model::Feasibility) and fitness penalties instead.

use thiserror::Error;

/// Errors produced by the solver, the simulators and configuration loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// A caller passed arguments that violate a function contract, e.g. an
    /// empty random range or an empty candidate set.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A configuration record failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An action name did not match any catalog entry.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// A settings document could not be decoded.
    #[error("failed to parse settings: {0}")]
    Parse(String),
}

impl SolverError {
    /// Returns `true` for contract violations ([`SolverError::InvalidArgument`]).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SolverError::InvalidArgument(_))
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SolverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_kind() {
        let err = SolverError::InvalidArgument("max <= min".into());
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "invalid argument: max <= min");

        let err = SolverError::InvalidConfig("population".into());
        assert!(!err.is_invalid_argument());
    }
}
