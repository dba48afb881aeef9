//! Request feed use case.
//!
//! Owns the feed state and drives it from the inspector API: the snapshot
//! query, the live subscription and the clear mutation.

use rhole_domain::{FeedState, RequestId};
use tracing::{debug, info, warn};

use crate::ports::{InspectorApi, RequestSubscription};
use crate::{ApplicationError, ApplicationResult};

/// The live request feed.
///
/// The subscription is opened at most once per feed; [`RequestFeed::unmount`]
/// (or dropping the feed) tears it down.
pub struct RequestFeed<A> {
    api: A,
    state: FeedState,
    subscription: Option<RequestSubscription>,
    subscribed: bool,
}

impl<A: InspectorApi> RequestFeed<A> {
    /// Creates a feed that has not loaded or subscribed yet.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: FeedState::new(),
            subscription: None,
            subscribed: false,
        }
    }

    /// Current feed state.
    #[must_use]
    pub const fn state(&self) -> &FeedState {
        &self.state
    }

    /// Returns true while the live stream is open.
    #[must_use]
    pub const fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribes, then loads the snapshot.
    ///
    /// Subscribing first means nothing captured while the snapshot is in
    /// flight is lost: those items wait in the stream and are merged once
    /// the snapshot is in.
    ///
    /// # Errors
    /// Returns the load error if the snapshot failed, otherwise the
    /// subscription error if the stream could not be opened.
    pub async fn start(&mut self) -> ApplicationResult<()> {
        let subscribed = self.subscribe().await;
        let loaded = self.load().await;
        loaded.and(subscribed)
    }

    /// Opens the live stream. Repeated calls are no-ops.
    ///
    /// # Errors
    /// Returns an error if the subscription cannot be established.
    pub async fn subscribe(&mut self) -> ApplicationResult<()> {
        if self.subscribed {
            debug!("feed already subscribed");
            return Ok(());
        }
        self.subscribed = true;

        match self.api.subscribe_requests().await {
            Ok(subscription) => {
                info!("subscribed to live requests");
                self.subscription = Some(subscription);
                Ok(())
            }
            Err(error) => {
                warn!(%error, "could not subscribe to live requests");
                Err(error)
            }
        }
    }

    /// Fetches the snapshot and ingests it.
    ///
    /// # Errors
    /// Returns `LoadFailure` if the query is rejected; the feed then
    /// shows the failure and is not retried.
    pub async fn load(&mut self) -> ApplicationResult<()> {
        match self.api.requests().await {
            Ok(snapshot) => {
                info!(count = snapshot.len(), "loaded request snapshot");
                self.transition(|state| state.ingest(snapshot));
                Ok(())
            }
            Err(error) => {
                let reason = error.to_string();
                warn!(%reason, "failed to load request snapshot");
                self.transition(|state| state.fail_load(reason.clone()));
                Err(ApplicationError::LoadFailure(reason))
            }
        }
    }

    /// Waits for the next live item and appends it.
    ///
    /// Returns `None` when there is no open subscription, so callers can
    /// stop polling.
    pub async fn next_event(&mut self) -> Option<ApplicationResult<RequestId>> {
        let subscription = self.subscription.as_mut()?;

        match subscription.next().await {
            Some(Ok(request)) => {
                let id = request.id.clone();
                debug!(%id, method = %request.fields.method, "live request");
                self.transition(|state| state.append(request));
                Some(Ok(id))
            }
            Some(Err(error)) => {
                warn!(%error, "live stream error");
                Some(Err(error))
            }
            None => {
                info!("live stream ended");
                self.subscription = None;
                Some(Err(ApplicationError::SubscriptionClosed(
                    "stream ended".to_string(),
                )))
            }
        }
    }

    /// Clears locally, then asks the server to clear.
    ///
    /// The local list is emptied first and is not restored if the server
    /// call fails.
    ///
    /// # Errors
    /// Returns `ClearFailure` if the mutation fails or is not confirmed.
    pub async fn clear(&mut self) -> ApplicationResult<()> {
        self.transition(FeedState::clear);

        match self.api.clear_requests().await {
            Ok(true) => {
                info!("cleared requests");
                Ok(())
            }
            Ok(false) => {
                warn!("server did not confirm clear");
                Err(ApplicationError::ClearFailure(
                    "server did not confirm".to_string(),
                ))
            }
            Err(error) => {
                warn!(%error, "clear mutation failed");
                Err(ApplicationError::ClearFailure(error.to_string()))
            }
        }
    }

    /// Tears down the live stream.
    pub fn unmount(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
            info!("unsubscribed from live requests");
        }
    }

    fn transition(&mut self, f: impl FnOnce(FeedState) -> FeedState) {
        let state = std::mem::take(&mut self.state);
        self.state = f(state);
    }
}
