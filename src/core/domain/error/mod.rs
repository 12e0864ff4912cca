use thiserror::Error;

/// The main error type for BMC operations.
///
/// The three kinds mirror the three places a request can go wrong:
/// the wire call itself, the response envelope, and the payload
/// contents.
#[derive(Error, Debug)]
pub enum BmcError {
    /// The HTTP call failed: connection error, timeout, or a non-200
    /// status from the board.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The wire call succeeded but the response was not a shape this
    /// client understands: undecodable JSON, a missing envelope key, or
    /// an empty wrapper array.
    ///
    /// Distinct from [`BmcError::Transport`] so callers can tell a
    /// retryable network failure from a permanent API-contract mismatch.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A payload or configuration value failed domain validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Specialized error type for validation failures.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A specific field failed validation.
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// A format/syntax violation.
    #[error("Format error: {0}")]
    Format(String),

    /// A domain constraint violation.
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Type alias for Results that may fail with a BmcError.
pub type BmcResult<T> = Result<T, BmcError>;
