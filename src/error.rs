//! Error types for the automaton and its harness.
//!
//! Every variant is a precondition violation: it is raised before a trial
//! starts stepping, never from inside the stochastic loop.

use thiserror::Error;

/// Result alias using [`KrinskyError`].
pub type Result<T> = std::result::Result<T, KrinskyError>;

/// Unified error type for model lookups and run configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KrinskyError {
    /// Action identifier outside `[1, ACTIONS]`.
    #[error("invalid action {0}: expected 1..={max}", max = crate::ACTIONS)]
    InvalidAction(u8),

    /// State identifier outside `[1, STATES]`.
    #[error("invalid state {0}: expected 1..={max}", max = crate::STATES)]
    InvalidState(u8),

    /// A probability row failed validation.
    #[error("invalid distribution for action {action}: {reason}")]
    InvalidModel { action: u8, reason: String },

    /// Run parameters that cannot describe a trial (cutoff, trial count, noise).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
