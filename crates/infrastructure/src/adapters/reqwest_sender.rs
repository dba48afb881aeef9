//! Outbound HTTP implementation using reqwest.
//!
//! This adapter implements the `OutboundHttp` port: it fires the manual
//! request from the send panel at the capture endpoint and drops the
//! response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use rhole_application::ports::OutboundHttp;
use rhole_application::{ApplicationError, ApplicationResult};
use rhole_domain::{Method, OutboundRequest};
use tracing::debug;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound HTTP client using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestSender {
    client: Client,
}

impl ReqwestSender {
    /// Creates a new sender with default settings.
    ///
    /// Default configuration:
    /// - Timeout: 30 seconds
    /// - Follow redirects: up to 10
    /// - User-Agent: "rhole/{version}"
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> ApplicationResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("rhole/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a new sender with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Converts a domain `Method` to a reqwest `Method`.
    fn to_reqwest_method(method: &Method) -> ApplicationResult<reqwest::Method> {
        Ok(match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Receive => {
                return Err(ApplicationError::Internal(
                    "RECEIVE is not an HTTP method".to_string(),
                ));
            }
            Method::Extension(name) => reqwest::Method::from_bytes(name.as_bytes())
                .map_err(|e| ApplicationError::Internal(format!("{e}: {name}")))?,
        })
    }

    /// Maps reqwest errors to a transport failure with a readable reason.
    fn map_error(error: &reqwest::Error) -> ApplicationError {
        let host = error
            .url()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());

        let reason = if error.is_timeout() {
            format!("request to {host} timed out")
        } else if error.is_connect() {
            let message = error.to_string();
            if message.to_lowercase().contains("refused") {
                let port = error.url().and_then(url::Url::port_or_known_default);
                port.map_or_else(
                    || format!("connection refused by {host}"),
                    |port| format!("connection refused by {host}:{port}"),
                )
            } else {
                format!("could not connect to {host}: {message}")
            }
        } else if error.is_redirect() {
            "too many redirects (max 10)".to_string()
        } else {
            error.to_string()
        };

        ApplicationError::TransportFailure(reason)
    }
}

#[async_trait]
impl OutboundHttp for ReqwestSender {
    async fn send(&self, request: &OutboundRequest) -> ApplicationResult<()> {
        let mut builder = self
            .client
            .request(Self::to_reqwest_method(&request.method)?, request.url.clone())
            .header(CONTENT_TYPE, request.content_type());

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| Self::map_error(&e))?;
        debug!(status = response.status().as_u16(), "capture endpoint responded");
        Ok(())
    }
}
