//! Load Server Info Use Case
//!
//! Fetches the header metadata once. There is no retry: a failure is shown
//! as a static message until the console is restarted.

use std::sync::Arc;

use rhole_domain::{FailureKind, LoadState, ServerInfo};
use tracing::{info, warn};

use crate::ports::InspectorApi;

/// Use case for loading server metadata.
pub struct LoadServerInfo<A: InspectorApi> {
    api: Arc<A>,
}

impl<A: InspectorApi> LoadServerInfo<A> {
    /// Creates a new `LoadServerInfo` use case.
    pub const fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Runs the query and folds the outcome into a [`LoadState`].
    pub async fn execute(&self) -> LoadState<ServerInfo> {
        match self.api.server_info().await {
            Ok(server_info) => {
                info!(
                    protocol = %server_info.protocol,
                    address = %server_info.request_address,
                    port = server_info.request_port,
                    "loaded server info"
                );
                LoadState::loaded(server_info)
            }
            Err(error) => {
                warn!(%error, "failed to load server info");
                LoadState::failed(FailureKind::LoadFailure, error.to_string())
            }
        }
    }
}
