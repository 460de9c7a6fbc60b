//! Error types for the scheduling engine.
//!
//! All validation happens eagerly: a malformed instance or configuration is
//! rejected before any search begins, never silently corrected. Strategy
//! failures inside [`solve_many`](crate::solver::SolverRegistry::solve_many)
//! are captured per strategy and do not abort sibling strategies.

use thiserror::Error;

/// Errors produced by instance construction, configuration, and solving.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// The instance violates a structural invariant (empty machine list,
    /// out-of-range machine id, non-contiguous operation sequence, ...).
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// A search parameter is out of range (population size, rates, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The requested strategy id is not present in the registry.
    #[error("unknown strategy `{0}`")]
    UnknownStrategy(String),

    /// A strategy raised during solving. Fatal in `solve`, captured
    /// per strategy in `solve_many`.
    #[error("strategy `{id}` failed: {message}")]
    StrategyFailure {
        /// Id of the strategy that failed.
        id: String,
        /// Failure description (error message or panic payload).
        message: String,
    },
}

impl Error {
    pub(crate) fn invalid_instance(msg: impl Into<String>) -> Self {
        Error::InvalidInstance(msg.into())
    }

    pub(crate) fn invalid_configuration(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}
