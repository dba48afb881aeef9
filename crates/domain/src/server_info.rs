//! Metadata reported by the capture server.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Transport the capture server listens with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Plain HTTP endpoint.
    #[default]
    Http,
    /// WebSocket endpoint.
    Ws,
}

impl Transport {
    /// URL scheme for this transport.
    #[must_use]
    pub const fn scheme(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Ws => "ws",
        }
    }

    /// Title of the manual send panel for this transport.
    #[must_use]
    pub const fn send_title(self) -> &'static str {
        match self {
            Self::Http => "Send a Request",
            Self::Ws => "Send a WebSocket Message",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

impl FromStr for Transport {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "ws" => Ok(Self::Ws),
            other => Err(DomainError::InvalidProtocol(other.to_string())),
        }
    }
}

/// Server metadata: where captures are accepted and which build is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Transport of the capture endpoint.
    pub protocol: Transport,
    /// Address the capture endpoint is bound to.
    pub request_address: String,
    /// Port the capture endpoint listens on.
    pub request_port: u16,
    /// Port of the web/GraphQL endpoint, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_port: Option<u16>,
    /// Build metadata such as `version`.
    #[serde(default)]
    pub build_info: BTreeMap<String, String>,
}

impl ServerInfo {
    /// Creates server info with empty build metadata.
    #[must_use]
    pub fn new(protocol: Transport, request_address: impl Into<String>, request_port: u16) -> Self {
        Self {
            protocol,
            request_address: request_address.into(),
            request_port,
            web_port: None,
            build_info: BTreeMap::new(),
        }
    }

    /// Adds a build metadata entry.
    #[must_use]
    pub fn with_build_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.build_info.insert(key.into(), value.into());
        self
    }

    /// Capture endpoint URL, e.g. `http://localhost:8080`.
    #[must_use]
    pub fn listening_url(&self) -> String {
        format!(
            "{}://{}:{}",
            self.protocol, self.request_address, self.request_port
        )
    }

    /// URL an outbound HTTP request should target by default.
    #[must_use]
    pub fn http_url(&self) -> String {
        format!("http://{}:{}", self.request_address, self.request_port)
    }

    /// Reported build version, or an empty string.
    #[must_use]
    pub fn version(&self) -> &str {
        self.build_info.get("version").map_or("", String::as_str)
    }
}
