//! WebSocket send panel types.
//!
//! This module provides the connection state machine and message types for
//! sending ad hoc messages to a WebSocket capture endpoint.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::send::default_body;
use crate::server_info::ServerInfo;

/// WebSocket connection state.
///
/// Driven only by socket open and close events; there is no reconnecting
/// state because reconnection is never attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Not connected.
    #[default]
    Disconnected,
    /// Handshake in progress.
    Connecting,
    /// Connected and ready.
    Connected,
}

impl ConnectionState {
    /// Check if the connection is active.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Get a human-readable status string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
        }
    }
}

/// A message sent from the panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    /// Message content.
    pub content: String,
    /// Size in bytes.
    pub size: usize,
}

impl WebSocketMessage {
    /// Create a new outgoing text message.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        let content = content.into();
        let size = content.len();
        Self { content, size }
    }

    /// Format the size for display.
    #[must_use]
    pub fn size_display(&self) -> String {
        #[allow(clippy::cast_precision_loss)]
        if self.size >= 1024 * 1024 {
            format!("{:.2} MB", self.size as f64 / (1024.0 * 1024.0))
        } else if self.size >= 1024 {
            format!("{:.2} KB", self.size as f64 / 1024.0)
        } else {
            format!("{} B", self.size)
        }
    }
}

/// WebSocket-related errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebSocketError {
    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// Send failed.
    #[error("Failed to send message: {0}")]
    SendFailed(String),
    /// A connection is already open or opening.
    #[error("Already connected")]
    AlreadyConnected,
    /// Not connected.
    #[error("Not connected")]
    NotConnected,
}

/// State of the WebSocket send panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebSocketPanel {
    url: String,
    body: String,
    state: ConnectionState,
    connected_at: Option<chrono::DateTime<chrono::Utc>>,
    messages_sent: u64,
}

impl WebSocketPanel {
    /// Create a disconnected panel targeting `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: default_body(),
            state: ConnectionState::Disconnected,
            connected_at: None,
            messages_sent: 0,
        }
    }

    /// Create a panel aimed at the server's capture endpoint.
    #[must_use]
    pub fn for_server(info: &ServerInfo) -> Self {
        Self::new(info.listening_url())
    }

    /// Current connection state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Number of messages sent on the current connection.
    #[must_use]
    pub const fn messages_sent(&self) -> u64 {
        self.messages_sent
    }

    /// Changes the target URL. Only possible while disconnected.
    ///
    /// # Errors
    /// Returns `AlreadyConnected` while a connection is open or opening.
    pub fn set_url(&mut self, url: impl Into<String>) -> Result<(), WebSocketError> {
        if self.state != ConnectionState::Disconnected {
            return Err(WebSocketError::AlreadyConnected);
        }
        self.url = url.into();
        Ok(())
    }

    /// The message body; only available while connected.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.state.is_connected().then_some(self.body.as_str())
    }

    /// Mutable access to the body; only available while connected.
    pub fn compose(&mut self) -> Option<&mut String> {
        if self.state.is_connected() {
            Some(&mut self.body)
        } else {
            None
        }
    }

    /// Starts a connection attempt and returns the validated URL.
    ///
    /// # Errors
    /// Returns an error if already connecting/connected or the URL is not a
    /// `ws://`/`wss://` URL.
    pub fn begin_connect(&mut self) -> Result<Url, WebSocketError> {
        if self.state != ConnectionState::Disconnected {
            return Err(WebSocketError::AlreadyConnected);
        }
        let url = Url::parse(self.url.trim())
            .map_err(|e| WebSocketError::InvalidUrl(format!("{e}: {}", self.url)))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(WebSocketError::InvalidUrl(
                "URL must start with ws:// or wss://".to_string(),
            ));
        }
        self.state = ConnectionState::Connecting;
        Ok(url)
    }

    /// The socket reported open.
    pub fn on_open(&mut self) {
        self.state = ConnectionState::Connected;
        self.connected_at = Some(chrono::Utc::now());
        self.messages_sent = 0;
    }

    /// The socket closed, locally or remotely, or never opened.
    pub fn on_close(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.connected_at = None;
    }

    /// Builds the message to send from the current body.
    ///
    /// # Errors
    /// Returns `NotConnected` unless the socket is open.
    pub fn outgoing(&self) -> Result<WebSocketMessage, WebSocketError> {
        if !self.state.is_connected() {
            return Err(WebSocketError::NotConnected);
        }
        Ok(WebSocketMessage::text(self.body.clone()))
    }

    /// Record a sent message.
    pub const fn record_sent(&mut self) {
        self.messages_sent = self.messages_sent.saturating_add(1);
    }

    /// How long the connection has been open, for display.
    #[must_use]
    pub fn duration_display(&self) -> String {
        self.connected_at
            .map(|t| chrono::Utc::now() - t)
            .map_or_else(
                || "-".to_string(),
                |d| {
                    let secs = d.num_seconds();
                    if secs >= 3600 {
                        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
                    } else if secs >= 60 {
                        format!("{}m {}s", secs / 60, secs % 60)
                    } else {
                        format!("{secs}s")
                    }
                },
            )
    }
}
