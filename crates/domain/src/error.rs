//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method cannot be used for this operation.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The server reported a transport protocol we do not know.
    #[error("invalid protocol: {0}")]
    InvalidProtocol(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
