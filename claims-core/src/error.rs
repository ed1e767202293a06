//! Error types for the claims ledger
//!
//! Every operation is all-or-nothing: an error means nothing the operation
//! touched was mutated, shared counters included. Messages name the failing
//! precondition rather than a generic failure.

use thiserror::Error;

/// Claims ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    /// Caller lacks the role the operation requires.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Target entity is not in the state the operation requires.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Referenced entity address is uninitialized.
    #[error("not found: {0}")]
    NotFound(String),

    /// Entity already exists at the derived address.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// One-time initialization was already performed.
    #[error("already initialized: {0}")]
    AlreadyInitialized(String),

    /// The claim queue is disabled for new submissions.
    #[error("claim queue is currently disabled")]
    QueueDisabled,

    /// The claim queue is at its size limit.
    #[error("claim queue is full")]
    QueueFull,

    /// Payment token mint is not in the fee-token registry.
    #[error("unknown payment token: {0}")]
    UnknownPaymentToken(String),

    /// A field violated its length or range constraint.
    #[error("validation error: {0}")]
    Validation(String),

    /// A counter or amount total would leave its representable range.
    #[error("counter would leave its representable range")]
    CounterOverflow,
}

/// Result type alias for claims ledger operations
pub type ClaimsResult<T> = Result<T, ClaimsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_precondition() {
        let err = ClaimsError::InvalidState("claim is not in the assigned state".to_string());
        assert_eq!(
            err.to_string(),
            "invalid state: claim is not in the assigned state"
        );

        let err = ClaimsError::UnknownPaymentToken("mint:usdc".to_string());
        assert_eq!(err.to_string(), "unknown payment token: mint:usdc");
    }
}
