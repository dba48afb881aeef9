//! Inspector API port
//!
//! The query/subscription API exposed by the capture server.

use std::sync::Arc;

use async_trait::async_trait;
use rhole_domain::{CapturedRequest, ServerInfo};
use tokio::sync::{mpsc, oneshot};

use crate::ApplicationResult;

/// Port for the capture server's query, mutation and subscription API.
#[async_trait]
pub trait InspectorApi: Send + Sync {
    /// Fetches server metadata.
    ///
    /// # Errors
    /// Returns an error if the query is rejected or the server is unreachable.
    async fn server_info(&self) -> ApplicationResult<ServerInfo>;

    /// Fetches every captured request (the snapshot).
    ///
    /// # Errors
    /// Returns an error if the query is rejected or the server is unreachable.
    async fn requests(&self) -> ApplicationResult<Vec<CapturedRequest>>;

    /// Asks the server to discard its history. Clearing an empty history
    /// succeeds.
    ///
    /// # Errors
    /// Returns an error if the mutation could not be delivered.
    async fn clear_requests(&self) -> ApplicationResult<bool>;

    /// Opens the live stream of newly captured requests.
    ///
    /// # Errors
    /// Returns an error if the subscription cannot be established.
    async fn subscribe_requests(&self) -> ApplicationResult<RequestSubscription>;
}

#[async_trait]
impl<T: InspectorApi + ?Sized> InspectorApi for Arc<T> {
    async fn server_info(&self) -> ApplicationResult<ServerInfo> {
        (**self).server_info().await
    }

    async fn requests(&self) -> ApplicationResult<Vec<CapturedRequest>> {
        (**self).requests().await
    }

    async fn clear_requests(&self) -> ApplicationResult<bool> {
        (**self).clear_requests().await
    }

    async fn subscribe_requests(&self) -> ApplicationResult<RequestSubscription> {
        (**self).subscribe_requests().await
    }
}

/// Receiving end of a live request stream.
///
/// Dropping the subscription tears down the underlying transport.
#[derive(Debug)]
pub struct RequestSubscription {
    events: mpsc::Receiver<ApplicationResult<CapturedRequest>>,
    cancel: Option<oneshot::Sender<()>>,
}

impl RequestSubscription {
    /// Creates a connected subscription/sink pair with a bounded buffer.
    #[must_use]
    pub fn channel(capacity: usize) -> (SubscriptionSink, Self) {
        let (events_tx, events_rx) = mpsc::channel(capacity);
        let (cancel_tx, cancel_rx) = oneshot::channel();
        (
            SubscriptionSink {
                events: events_tx,
                cancelled: cancel_rx,
            },
            Self {
                events: events_rx,
                cancel: Some(cancel_tx),
            },
        )
    }

    /// Waits for the next event. `None` once the stream has ended.
    pub async fn next(&mut self) -> Option<ApplicationResult<CapturedRequest>> {
        self.events.recv().await
    }

    /// Signals the producer to stop.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }
}

impl Drop for RequestSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Producing end of a live request stream, held by the adapter.
#[derive(Debug)]
pub struct SubscriptionSink {
    /// Where events are delivered.
    pub events: mpsc::Sender<ApplicationResult<CapturedRequest>>,
    /// Resolves when the subscriber cancels or goes away.
    pub cancelled: oneshot::Receiver<()>,
}
