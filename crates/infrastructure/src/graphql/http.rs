//! GraphQL over HTTP using reqwest.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::documents::Document;
use super::error::GraphQlError;
use super::wire::{OperationPayload, Response};

/// Per-operation timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs queries and mutations against one endpoint.
#[derive(Debug, Clone)]
pub struct GraphQlHttp {
    client: Client,
    url: Url,
}

impl GraphQlHttp {
    /// Creates a client for `url`.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(url: Url) -> Result<Self, GraphQlError> {
        let client = Client::builder()
            .user_agent(concat!("rhole/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GraphQlError::Http(e.to_string()))?;
        Ok(Self::with_client(client, url))
    }

    /// Creates a client reusing an existing reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    /// The endpoint URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Posts `document` and decodes its `data`.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success status, an
    /// undecodable body, GraphQL errors, or missing data.
    pub async fn execute<T: DeserializeOwned>(&self, document: Document) -> Result<T, GraphQlError> {
        debug!(operation = document.operation_name, url = %self.url, "graphql request");

        let response = self
            .client
            .post(self.url.clone())
            .json(&OperationPayload::from(document))
            .send()
            .await
            .map_err(|e| GraphQlError::Http(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GraphQlError::Http(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            // Validation failures come back as 4xx with a GraphQL error list.
            return Err(serde_json::from_slice::<Response<serde_json::Value>>(&bytes)
                .ok()
                .and_then(|envelope| envelope.into_data().err())
                .filter(|error| matches!(error, GraphQlError::Rejected(_)))
                .unwrap_or(GraphQlError::Status(status.as_u16())));
        }

        let envelope: Response<T> = serde_json::from_slice(&bytes)?;
        envelope.into_data()
    }
}
