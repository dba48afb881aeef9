//! GraphQL transport errors.

use rhole_application::ApplicationError;
use thiserror::Error;

/// Errors talking to the GraphQL endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphQlError {
    /// The HTTP request could not be delivered.
    #[error("request failed: {0}")]
    Http(String),

    /// The endpoint answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// The WebSocket could not be opened or broke.
    #[error("websocket error: {0}")]
    WebSocket(String),

    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The server returned GraphQL errors.
    #[error("{}", .0.join("; "))]
    Rejected(Vec<String>),

    /// The response carried neither data nor errors.
    #[error("response has no data")]
    MissingData,

    /// The subscription handshake went wrong.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<GraphQlError> for ApplicationError {
    fn from(error: GraphQlError) -> Self {
        match error {
            GraphQlError::Http(_) | GraphQlError::Status(_) | GraphQlError::WebSocket(_) => {
                Self::TransportFailure(error.to_string())
            }
            GraphQlError::Decode(_)
            | GraphQlError::Rejected(_)
            | GraphQlError::MissingData
            | GraphQlError::Protocol(_) => Self::LoadFailure(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for GraphQlError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for GraphQlError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(error.to_string())
    }
}
