//! Application-level errors
//!
//! The taxonomy keeps fatal categories distinguishable for operators: a
//! precondition violation ("bad input") never looks like a transport failure
//! ("remote system unreachable"). Nothing is retried or swallowed.

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error (selector decode, rule validation)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Required argument missing; immediate termination, no retry
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Collaborator unreachable or non-success status, raw context preserved
    #[error("transport error: {context}")]
    Transport { context: String },

    /// Load script could not be persisted or spawned
    #[error("load script error: {0}")]
    LoadScript(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Create a precondition error
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Create a transport error preserving the raw response context
    pub fn transport(context: impl Into<String>) -> Self {
        Self::Transport {
            context: context.into(),
        }
    }
}
