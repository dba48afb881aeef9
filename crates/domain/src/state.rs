//! Load state types for UI binding.
//!
//! Remote data (server info, the request snapshot) moves through a small
//! state machine so the UI can show the right placeholder at each stage.

use serde::{Deserialize, Serialize};

/// Represents the state of a one-shot remote fetch.
///
/// - `Loading`: fetch in flight, show a loading placeholder
/// - `Loaded`: data available
/// - `Failed`: show a static failure message, no retry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState<T> {
    /// The fetch has not resolved yet.
    #[default]
    Loading,

    /// The fetch succeeded.
    Loaded {
        /// The fetched data.
        value: T,
    },

    /// The fetch failed.
    Failed {
        /// Error category.
        kind: FailureKind,
        /// Human-readable error message.
        message: String,
    },
}

impl<T> LoadState<T> {
    /// Creates a Loaded state.
    #[must_use]
    pub const fn loaded(value: T) -> Self {
        Self::Loaded { value }
    }

    /// Creates a Failed state.
    #[must_use]
    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            message: message.into(),
        }
    }

    /// Returns true while loading.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns true if the fetch failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns the value if loaded.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Loaded { value } => Some(value),
            _ => None,
        }
    }
}

/// Categories of failure surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A query (snapshot or server info) was rejected.
    LoadFailure,

    /// A WebSocket connect or send failed, or an outbound request
    /// could not be delivered.
    TransportFailure,

    /// The server did not confirm a clear.
    ClearFailure,
}

impl FailureKind {
    /// Returns user-friendly suggestions for this failure.
    #[must_use]
    pub const fn suggestions(&self) -> &[&'static str] {
        match self {
            Self::LoadFailure => &[
                "Check that Request Hole is running with the web UI enabled",
                "Verify the GraphQL endpoint address and port",
            ],
            Self::TransportFailure => &[
                "Check that the capture endpoint is listening",
                "Verify the URL scheme matches the server protocol",
            ],
            Self::ClearFailure => &["Retry the clear once the server is reachable"],
        }
    }

    /// Returns a human-readable title for this failure.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::LoadFailure => "Failed to load.",
            Self::TransportFailure => "Connection failed.",
            Self::ClearFailure => "Failed to clear requests on the server.",
        }
    }
}
