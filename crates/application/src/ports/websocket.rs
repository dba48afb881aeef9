//! WebSocket transport port

use async_trait::async_trait;
use url::Url;

use crate::ApplicationResult;

/// Opens raw WebSocket connections.
#[async_trait]
pub trait WebSocketConnector: Send + Sync {
    /// Performs the handshake and returns the open link.
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established.
    async fn connect(&self, url: &Url) -> ApplicationResult<Box<dyn WebSocketLink>>;
}

/// An open WebSocket connection.
#[async_trait]
pub trait WebSocketLink: Send {
    /// Sends one text frame.
    ///
    /// # Errors
    /// Returns an error if the frame could not be written.
    async fn send_text(&mut self, text: &str) -> ApplicationResult<()>;

    /// Closes the connection.
    ///
    /// # Errors
    /// Returns an error if the close frame could not be written.
    async fn close(&mut self) -> ApplicationResult<()>;

    /// Returns false once either side has closed the connection.
    fn is_open(&self) -> bool;

    /// Resolves when the connection is no longer open.
    async fn closed(&mut self);
}
