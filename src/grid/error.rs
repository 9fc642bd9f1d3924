//! Errors surfaced to callers of the simulation path.

use thiserror::Error;

/// Failure of a simulation request that reaches the caller.
///
/// External engine failures never appear here; the selector absorbs them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Negative, non-finite or over-ceiling input. Never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal fault while producing a result.
    #[error("internal error: {0}")]
    Internal(String),
}
