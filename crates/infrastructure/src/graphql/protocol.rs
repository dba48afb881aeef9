//! Messages of the `graphql-ws` WebSocket sub-protocol
//! (subscriptions-transport-ws).
//!
//! Flow: `connection_init` → `connection_ack`, then `start` per operation;
//! the server answers with `data` frames until `complete` or `error`, and
//! sends `ka` keep-alives in between. The client ends with `stop` and
//! `connection_terminate`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::wire::OperationPayload;

/// Value of the `Sec-WebSocket-Protocol` header.
pub const GRAPHQL_WS_PROTOCOL: &str = "graphql-ws";

/// Client-to-server frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Opens the session.
    ConnectionInit {
        /// Connection parameters; always an empty object.
        payload: Value,
    },
    /// Starts an operation.
    Start {
        /// Client-chosen operation id.
        id: String,
        /// The operation.
        payload: OperationPayload,
    },
    /// Stops an operation.
    Stop {
        /// Operation id given in `Start`.
        id: String,
    },
    /// Ends the session.
    ConnectionTerminate,
}

impl ClientMessage {
    /// `connection_init` with no parameters.
    #[must_use]
    pub fn init() -> Self {
        Self::ConnectionInit {
            payload: Value::Object(serde_json::Map::new()),
        }
    }

    /// Encodes the frame as JSON text.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Server-to-client frames.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Session accepted.
    ConnectionAck,
    /// Session refused.
    ConnectionError {
        /// Error details.
        #[serde(default)]
        payload: Value,
    },
    /// Keep-alive.
    Ka,
    /// One result of an operation.
    Data {
        /// Operation id.
        id: String,
        /// A GraphQL response envelope.
        payload: Value,
    },
    /// The operation failed before producing results.
    Error {
        /// Operation id.
        id: String,
        /// Error details.
        #[serde(default)]
        payload: Value,
    },
    /// The operation finished.
    Complete {
        /// Operation id.
        id: String,
    },
    /// Any frame type this client does not know.
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    /// Decodes a text frame.
    ///
    /// # Errors
    /// Returns an error if the text is not a protocol frame.
    pub fn from_text(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Extracts readable messages from an error payload, which may be a single
/// error object or a list of them.
#[must_use]
pub fn error_messages(payload: &Value) -> Vec<String> {
    let message = |value: &Value| {
        value
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| value.to_string(), str::to_string)
    };
    match payload {
        Value::Array(errors) => errors.iter().map(message).collect(),
        Value::Null => vec!["unknown error".to_string()],
        other => vec![message(other)],
    }
}
