//! Application error types

use rhole_domain::{DomainError, FailureKind, WebSocketError};
use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A query (snapshot or server info) was rejected.
    #[error("failed to load: {0}")]
    LoadFailure(String),

    /// An outbound request or WebSocket operation failed.
    #[error("transport error: {0}")]
    TransportFailure(String),

    /// The clear mutation failed or was not confirmed.
    #[error("failed to clear requests: {0}")]
    ClearFailure(String),

    /// The live stream ended.
    #[error("subscription closed: {0}")]
    SubscriptionClosed(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// The user-facing failure category, if any.
    #[must_use]
    pub const fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::LoadFailure(_) => Some(FailureKind::LoadFailure),
            Self::TransportFailure(_) | Self::SubscriptionClosed(_) => {
                Some(FailureKind::TransportFailure)
            }
            Self::ClearFailure(_) => Some(FailureKind::ClearFailure),
            Self::Domain(_) | Self::Internal(_) => None,
        }
    }
}

impl From<WebSocketError> for ApplicationError {
    fn from(error: WebSocketError) -> Self {
        Self::TransportFailure(error.to_string())
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
