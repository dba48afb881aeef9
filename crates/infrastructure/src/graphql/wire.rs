//! JSON shapes exchanged with the GraphQL endpoint.

use std::collections::BTreeMap;

use rhole_domain::{CapturedRequest, ServerInfo, Transport};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::documents::Document;
use super::error::GraphQlError;

/// Request body for one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationPayload {
    /// Document text.
    pub query: &'static str,
    /// Operation to run.
    #[serde(rename = "operationName")]
    pub operation_name: &'static str,
    /// Always empty; none of the operations take arguments.
    pub variables: Value,
}

impl From<Document> for OperationPayload {
    fn from(document: Document) -> Self {
        Self {
            query: document.query,
            operation_name: document.operation_name,
            variables: Value::Object(serde_json::Map::new()),
        }
    }
}

/// A GraphQL response envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Response<T> {
    /// Result data; absent or null on failure.
    #[serde(default)]
    pub data: Option<T>,
    /// Error list; any entry fails the operation.
    #[serde(default)]
    pub errors: Option<Vec<ErrorEntry>>,
}

/// One GraphQL error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorEntry {
    /// Error message.
    pub message: String,
}

impl<T> Response<T> {
    /// Returns the data, or the reason there is none.
    ///
    /// # Errors
    /// Returns `Rejected` when errors are present, `MissingData` when the
    /// data is absent.
    pub fn into_data(self) -> Result<T, GraphQlError> {
        match self.errors {
            Some(errors) if !errors.is_empty() => Err(GraphQlError::Rejected(
                errors.into_iter().map(|e| e.message).collect(),
            )),
            _ => self.data.ok_or(GraphQlError::MissingData),
        }
    }
}

/// `serverInfo` query result.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfoData {
    /// Server metadata.
    #[serde(rename = "serverInfo")]
    pub server_info: WireServerInfo,
}

/// Server metadata as sent, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct WireServerInfo {
    /// `http` or `ws`.
    pub protocol: String,
    /// Bound address.
    pub request_address: String,
    /// Capture port.
    pub request_port: u16,
    /// Web UI port.
    #[serde(default)]
    pub web_port: Option<u16>,
    /// Build metadata; may be null.
    #[serde(default)]
    pub build_info: Option<BTreeMap<String, String>>,
}

impl TryFrom<WireServerInfo> for ServerInfo {
    type Error = GraphQlError;

    fn try_from(wire: WireServerInfo) -> Result<Self, Self::Error> {
        let protocol: Transport = wire
            .protocol
            .parse()
            .map_err(|e: rhole_domain::DomainError| GraphQlError::Decode(e.to_string()))?;
        let mut info = Self::new(protocol, wire.request_address, wire.request_port);
        info.web_port = wire.web_port;
        info.build_info = wire.build_info.unwrap_or_default();
        Ok(info)
    }
}

/// `requests` query result. A null list reads as empty.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestsData {
    /// Every captured request.
    #[serde(default)]
    pub requests: Option<Vec<CapturedRequest>>,
}

/// One `request` subscription event.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestData {
    /// The newly captured request.
    pub request: CapturedRequest,
}

/// `clearRequests` mutation result.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ClearData {
    /// Whether the server cleared its history.
    #[serde(rename = "clearRequests")]
    pub clear_requests: bool,
}
