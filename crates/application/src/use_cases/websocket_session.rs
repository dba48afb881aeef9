//! WebSocket Session Use Case
//!
//! Drives the WebSocket send panel: connect, send the composed body,
//! disconnect. The panel state follows the socket; a remote close drops the
//! panel back to disconnected and nothing reconnects it.

use std::sync::Arc;

use rhole_domain::{ConnectionState, WebSocketError, WebSocketMessage, WebSocketPanel};
use tracing::{debug, info, warn};

use crate::ApplicationResult;
use crate::ports::{WebSocketConnector, WebSocketLink};

/// One WebSocket send panel and its connection.
pub struct WebSocketSession<C: WebSocketConnector> {
    connector: Arc<C>,
    panel: WebSocketPanel,
    link: Option<Box<dyn WebSocketLink>>,
}

impl<C: WebSocketConnector> WebSocketSession<C> {
    /// Creates a disconnected session for `panel`.
    pub const fn new(connector: Arc<C>, panel: WebSocketPanel) -> Self {
        Self {
            connector,
            panel,
            link: None,
        }
    }

    /// The panel state.
    #[must_use]
    pub const fn panel(&self) -> &WebSocketPanel {
        &self.panel
    }

    /// Current connection state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.panel.state()
    }

    /// Changes the target URL while disconnected.
    ///
    /// # Errors
    /// Returns a transport error while a connection is open.
    pub fn set_url(&mut self, url: impl Into<String>) -> ApplicationResult<()> {
        self.panel.set_url(url)?;
        Ok(())
    }

    /// Replaces the message body.
    ///
    /// # Errors
    /// Returns a transport error unless connected.
    pub fn set_body(&mut self, body: impl Into<String>) -> ApplicationResult<()> {
        let slot = self.panel.compose().ok_or(WebSocketError::NotConnected)?;
        *slot = body.into();
        Ok(())
    }

    /// Opens the connection.
    ///
    /// # Errors
    /// Returns a transport error if the URL is invalid, a connection is
    /// already open, or the handshake fails. The panel is left disconnected
    /// on failure.
    pub async fn connect(&mut self) -> ApplicationResult<()> {
        let url = self.panel.begin_connect()?;
        debug!(%url, "connecting");

        match self.connector.connect(&url).await {
            Ok(link) => {
                self.panel.on_open();
                self.link = Some(link);
                info!(%url, "websocket connected");
                Ok(())
            }
            Err(error) => {
                self.panel.on_close();
                warn!(%url, %error, "websocket connect failed");
                Err(error)
            }
        }
    }

    /// Sends the composed body as one text frame.
    ///
    /// # Errors
    /// Returns a transport error if not connected or the write fails. A
    /// failed write drops the connection and disconnects the panel.
    pub async fn send(&mut self) -> ApplicationResult<WebSocketMessage> {
        self.refresh();
        let message = self.panel.outgoing()?;
        let link = self.link.as_mut().ok_or(WebSocketError::NotConnected)?;

        if let Err(error) = link.send_text(&message.content).await {
            warn!(%error, "websocket send failed, dropping connection");
            self.link = None;
            self.panel.on_close();
            return Err(error);
        }

        self.panel.record_sent();
        debug!(size = message.size, "websocket message sent");
        Ok(message)
    }

    /// Closes the connection. A no-op while disconnected.
    ///
    /// # Errors
    /// Returns a transport error if the close frame could not be written;
    /// the panel is disconnected either way.
    pub async fn disconnect(&mut self) -> ApplicationResult<()> {
        let result = match self.link.take() {
            Some(mut link) => link.close().await,
            None => Ok(()),
        };
        if self.panel.state() != ConnectionState::Disconnected {
            info!("websocket disconnected");
        }
        self.panel.on_close();
        result
    }

    /// Syncs the panel with the socket and returns the resulting state.
    pub fn refresh(&mut self) -> ConnectionState {
        if self.link.as_ref().is_some_and(|link| !link.is_open()) {
            info!("websocket closed by peer");
            self.link = None;
            self.panel.on_close();
        }
        self.panel.state()
    }

    /// Resolves once the open connection closes, leaving the panel
    /// disconnected. Never resolves while there is no connection.
    pub async fn closed(&mut self) {
        match self.link.as_mut() {
            Some(link) => {
                link.closed().await;
                self.refresh();
            }
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ApplicationError;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use url::Url;

    #[derive(Default)]
    struct Wire {
        frames: Mutex<Vec<String>>,
        open: AtomicBool,
    }

    struct MockLink(Arc<Wire>);

    struct BrokenPipe;

    #[async_trait]
    impl WebSocketLink for BrokenPipe {
        async fn send_text(&mut self, _text: &str) -> ApplicationResult<()> {
            Err(WebSocketError::SendFailed("broken pipe".to_string()).into())
        }

        async fn close(&mut self) -> ApplicationResult<()> {
            Ok(())
        }

        fn is_open(&self) -> bool {
            true
        }

        async fn closed(&mut self) {
            std::future::pending::<()>().await;
        }
    }

    struct BrokenConnector;

    #[async_trait]
    impl WebSocketConnector for BrokenConnector {
        async fn connect(&self, _url: &Url) -> ApplicationResult<Box<dyn WebSocketLink>> {
            Ok(Box::new(BrokenPipe))
        }
    }

    #[async_trait]
    impl WebSocketLink for MockLink {
        async fn send_text(&mut self, text: &str) -> ApplicationResult<()> {
            if !self.is_open() {
                return Err(WebSocketError::SendFailed("closed".to_string()).into());
            }
            self.0.frames.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn close(&mut self) -> ApplicationResult<()> {
            self.0.open.store(false, Ordering::SeqCst);
            Ok(())
        }

        fn is_open(&self) -> bool {
            self.0.open.load(Ordering::SeqCst)
        }

        async fn closed(&mut self) {
            while self.is_open() {
                tokio::task::yield_now().await;
            }
        }
    }

    #[derive(Default)]
    struct MockConnector {
        wire: Arc<Wire>,
        refuse: bool,
    }

    #[async_trait]
    impl WebSocketConnector for MockConnector {
        async fn connect(&self, url: &Url) -> ApplicationResult<Box<dyn WebSocketLink>> {
            if self.refuse {
                return Err(WebSocketError::ConnectionFailed(url.to_string()).into());
            }
            self.wire.open.store(true, Ordering::SeqCst);
            Ok(Box::new(MockLink(Arc::clone(&self.wire))))
        }
    }

    fn session(connector: &Arc<MockConnector>) -> WebSocketSession<MockConnector> {
        WebSocketSession::new(
            Arc::clone(connector),
            WebSocketPanel::new("ws://localhost:8080"),
        )
    }

    #[tokio::test]
    async fn test_connect_send_disconnect() {
        let connector = Arc::new(MockConnector::default());
        let mut session = session(&connector);

        session.connect().await.unwrap();
        assert_eq!(session.state(), ConnectionState::Connected);

        let message = session.send().await.unwrap();
        assert_eq!(message.content, r#"{"hello":"world"}"#);
        assert_eq!(session.panel().messages_sent(), 1);
        assert_eq!(
            *connector.wire.frames.lock().unwrap(),
            vec![r#"{"hello":"world"}"#.to_string()]
        );

        session.disconnect().await.unwrap();
        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert!(!connector.wire.open.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_send_while_disconnected_is_rejected() {
        let connector = Arc::new(MockConnector::default());
        let mut session = session(&connector);

        let result = session.send().await;
        assert!(matches!(result, Err(ApplicationError::TransportFailure(_))));
        assert!(connector.wire.frames.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_body_is_editable_only_while_connected() {
        let connector = Arc::new(MockConnector::default());
        let mut session = session(&connector);
        assert!(session.set_body("ping").is_err());

        session.connect().await.unwrap();
        session.set_body("ping").unwrap();
        session.send().await.unwrap();
        assert_eq!(*connector.wire.frames.lock().unwrap(), vec!["ping".to_string()]);
    }

    #[tokio::test]
    async fn test_refused_connection_stays_disconnected() {
        let connector = Arc::new(MockConnector {
            refuse: true,
            ..MockConnector::default()
        });
        let mut session = session(&connector);

        assert!(session.connect().await.is_err());
        assert_eq!(session.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_invalid_scheme_is_rejected() {
        let connector = Arc::new(MockConnector::default());
        let mut session = WebSocketSession::new(
            Arc::clone(&connector),
            WebSocketPanel::new("http://localhost:8080"),
        );

        assert!(session.connect().await.is_err());
        assert_eq!(session.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_url_is_locked_while_connected() {
        let connector = Arc::new(MockConnector::default());
        let mut session = session(&connector);
        session.connect().await.unwrap();

        assert!(session.set_url("ws://elsewhere:1").is_err());
        assert_eq!(session.panel().url(), "ws://localhost:8080");
    }

    #[tokio::test]
    async fn test_remote_close_disconnects_without_reconnect() {
        let connector = Arc::new(MockConnector::default());
        let mut session = session(&connector);
        session.connect().await.unwrap();

        connector.wire.open.store(false, Ordering::SeqCst);
        session.closed().await;

        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert!(!connector.wire.open.load(Ordering::SeqCst));
        assert!(session.send().await.is_err());
    }

    #[tokio::test]
    async fn test_failed_write_disconnects_open_socket() {
        let mut session = WebSocketSession::new(
            Arc::new(BrokenConnector),
            WebSocketPanel::new("ws://localhost:8080"),
        );
        session.connect().await.unwrap();

        let result = session.send().await;
        assert!(matches!(result, Err(ApplicationError::TransportFailure(_))));
        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert_eq!(session.panel().messages_sent(), 0);
        assert!(session.panel().body().is_none());
    }
}
