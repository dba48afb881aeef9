//! Manual HTTP send panel.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};
use crate::request::Method;
use crate::server_info::ServerInfo;

/// Content type attached to every manual request.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Sample body offered when a panel opens.
#[must_use]
pub fn default_body() -> String {
    serde_json::json!({ "hello": "world" }).to_string()
}

/// What the user has typed into the HTTP send panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSendDraft {
    /// Selected method.
    pub method: Method,
    /// Target URL.
    pub url: String,
    /// Body text. Ignored for GET and HEAD.
    pub body: String,
}

impl Default for HttpSendDraft {
    fn default() -> Self {
        Self {
            method: Method::Get,
            url: String::new(),
            body: default_body(),
        }
    }
}

impl HttpSendDraft {
    /// Creates a draft targeting `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Creates a draft aimed at the server's capture endpoint.
    #[must_use]
    pub fn for_server(info: &ServerInfo) -> Self {
        Self::new(info.http_url())
    }

    /// Sets the method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Validates the draft and builds the request to fire.
    ///
    /// # Errors
    /// Returns an error if the method cannot be sent or the URL is not an
    /// absolute http(s) URL.
    pub fn outbound(&self) -> DomainResult<OutboundRequest> {
        if !self.method.is_sendable() {
            return Err(DomainError::UnsupportedMethod(self.method.to_string()));
        }

        let url = Url::parse(self.url.trim())
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {}", self.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "URL must start with http:// or https://: {}",
                self.url
            )));
        }

        let body = self.method.sends_body().then(|| self.body.clone());

        Ok(OutboundRequest {
            method: self.method.clone(),
            url,
            body,
        })
    }
}

/// A validated, fire-and-forget outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// Method to send.
    pub method: Method,
    /// Target URL.
    pub url: Url,
    /// Body, absent for GET and HEAD.
    pub body: Option<String>,
}

impl OutboundRequest {
    /// Content type header value.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }
}
