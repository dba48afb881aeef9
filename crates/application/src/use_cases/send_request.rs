//! Send Request Use Case
//!
//! Fires a manual HTTP request at the capture endpoint so it shows up in
//! the feed. The response is discarded.

use std::sync::Arc;

use rhole_domain::{HttpSendDraft, OutboundRequest};
use tracing::{info, warn};

use crate::ApplicationResult;
use crate::ports::OutboundHttp;

/// Use case for the HTTP send panel.
pub struct SendHttpRequest<C: OutboundHttp> {
    client: Arc<C>,
}

impl<C: OutboundHttp> SendHttpRequest<C> {
    /// Creates a new `SendHttpRequest` use case with the given client.
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Validates the draft and sends it.
    ///
    /// Returns the request that went out so callers can echo it.
    ///
    /// # Errors
    /// Returns a domain error for an invalid draft, or a transport error if
    /// the request could not be delivered.
    pub async fn execute(&self, draft: &HttpSendDraft) -> ApplicationResult<OutboundRequest> {
        let request = draft.outbound()?;

        match self.client.send(&request).await {
            Ok(()) => {
                info!(method = %request.method, url = %request.url, "sent request");
                Ok(request)
            }
            Err(error) => {
                warn!(method = %request.method, url = %request.url, %error, "send failed");
                Err(error)
            }
        }
    }
}
