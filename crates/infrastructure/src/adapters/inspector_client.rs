//! Inspector API implementation over GraphQL.
//!
//! This adapter implements the `InspectorApi` port: the snapshot and server
//! info queries and the clear mutation over HTTP, the live request stream
//! over a `graphql-ws` subscription forwarded into a bounded channel.

use async_trait::async_trait;
use rhole_application::ports::{InspectorApi, RequestSubscription, SubscriptionSink};
use rhole_application::{ApplicationError, ApplicationResult};
use rhole_domain::{CapturedRequest, ServerInfo};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::InspectorEndpoint;
use crate::graphql::documents::{ALL_REQUESTS, CLEAR_REQUESTS, REQUEST_SUBSCRIPTION, SERVER_INFO};
use crate::graphql::wire::{ClearData, RequestData, RequestsData, ServerInfoData};
use crate::graphql::{GraphQlError, GraphQlHttp, GraphQlSubscription};

/// Live events buffered between the socket and the feed.
const SUBSCRIPTION_BUFFER: usize = 64;

/// GraphQL client for the capture server.
#[derive(Debug, Clone)]
pub struct GraphQlInspectorClient {
    http: GraphQlHttp,
    ws_url: Url,
}

impl GraphQlInspectorClient {
    /// Creates a client for `endpoint`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(endpoint: &InspectorEndpoint) -> Result<Self, GraphQlError> {
        Ok(Self {
            http: GraphQlHttp::new(endpoint.http_url().clone())?,
            ws_url: endpoint.ws_url().clone(),
        })
    }

    /// The subscription URL.
    #[must_use]
    pub const fn ws_url(&self) -> &Url {
        &self.ws_url
    }
}

#[async_trait]
impl InspectorApi for GraphQlInspectorClient {
    async fn server_info(&self) -> ApplicationResult<ServerInfo> {
        let data: ServerInfoData = self.http.execute(SERVER_INFO).await?;
        Ok(ServerInfo::try_from(data.server_info)?)
    }

    async fn requests(&self) -> ApplicationResult<Vec<CapturedRequest>> {
        let data: RequestsData = self.http.execute(ALL_REQUESTS).await?;
        Ok(data.requests.unwrap_or_default())
    }

    async fn clear_requests(&self) -> ApplicationResult<bool> {
        let data: ClearData = self.http.execute(CLEAR_REQUESTS).await?;
        Ok(data.clear_requests)
    }

    async fn subscribe_requests(&self) -> ApplicationResult<RequestSubscription> {
        let subscription = GraphQlSubscription::start(&self.ws_url, REQUEST_SUBSCRIPTION)
            .await
            .map_err(|e| ApplicationError::TransportFailure(e.to_string()))?;

        let (sink, handle) = RequestSubscription::channel(SUBSCRIPTION_BUFFER);
        tokio::spawn(forward_requests(subscription, sink));
        Ok(handle)
    }
}

/// Pumps subscription events into the channel until either side goes away.
async fn forward_requests(mut subscription: GraphQlSubscription, sink: SubscriptionSink) {
    let SubscriptionSink {
        events,
        mut cancelled,
    } = sink;

    loop {
        tokio::select! {
            _ = &mut cancelled => {
                debug!("subscription cancelled by consumer");
                break;
            }
            next = subscription.next_data::<RequestData>() => {
                let event = match next {
                    Some(Ok(data)) => Ok(data.request),
                    Some(Err(error)) => {
                        warn!(%error, "subscription event failed");
                        Err(error.into())
                    }
                    None => {
                        info!("subscription ended");
                        return;
                    }
                };
                if events.send(event).await.is_err() {
                    debug!("subscription consumer gone");
                    break;
                }
            }
        }
    }

    if let Err(error) = subscription.stop().await {
        debug!(%error, "subscription teardown incomplete");
    }
}
