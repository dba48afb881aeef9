//! Outbound HTTP port

use async_trait::async_trait;
use rhole_domain::OutboundRequest;

use crate::ApplicationResult;

/// Port for firing manual HTTP requests at the capture endpoint.
///
/// The response is not inspected: the capture itself is the result the user
/// is after.
#[async_trait]
pub trait OutboundHttp: Send + Sync {
    /// Sends the request and discards the response.
    ///
    /// # Errors
    /// Returns an error if the request could not be delivered.
    async fn send(&self, request: &OutboundRequest) -> ApplicationResult<()>;
}
