//! Inspector endpoint configuration.
//!
//! The capture server exposes queries and mutations over HTTP and
//! subscriptions over WebSocket on the same path.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// GraphQL endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8081/query";

/// Errors from endpoint parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// Not a URL.
    #[error("invalid endpoint URL '{url}': {reason}")]
    Invalid {
        /// The rejected input.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// Not an http(s) URL.
    #[error("endpoint must start with http:// or https://: {0}")]
    UnsupportedScheme(String),
}

/// The GraphQL endpoint, as an HTTP URL and its WebSocket twin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorEndpoint {
    http: Url,
    ws: Url,
}

impl InspectorEndpoint {
    /// Builds the endpoint from an http(s) URL; the WebSocket URL swaps the
    /// scheme to ws(s).
    ///
    /// # Errors
    /// Returns an error if the URL does not use http or https.
    pub fn from_url(http: Url) -> Result<Self, EndpointError> {
        let ws_scheme = match http.scheme() {
            "http" => "ws",
            "https" => "wss",
            _ => return Err(EndpointError::UnsupportedScheme(http.to_string())),
        };
        let mut ws = http.clone();
        ws.set_scheme(ws_scheme)
            .map_err(|()| EndpointError::UnsupportedScheme(http.to_string()))?;
        Ok(Self { http, ws })
    }

    /// URL for queries and mutations.
    #[must_use]
    pub const fn http_url(&self) -> &Url {
        &self.http
    }

    /// URL for subscriptions.
    #[must_use]
    pub const fn ws_url(&self) -> &Url {
        &self.ws
    }
}

impl FromStr for InspectorEndpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(s.trim()).map_err(|e| EndpointError::Invalid {
            url: s.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_url(url)
    }
}

impl fmt::Display for InspectorEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.http)
    }
}
