//! WebSocket transport for the send panel using tokio-tungstenite.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use rhole_application::ApplicationResult;
use rhole_application::ports::{WebSocketConnector, WebSocketLink};
use rhole_domain::WebSocketError;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;
use url::Url;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens plain WebSocket connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

impl TungsteniteConnector {
    /// Creates a new connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WebSocketConnector for TungsteniteConnector {
    async fn connect(&self, url: &Url) -> ApplicationResult<Box<dyn WebSocketLink>> {
        let (socket, _) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| WebSocketError::ConnectionFailed(e.to_string()))?;
        debug!(%url, "websocket open");

        let (writer, reader) = socket.split();
        let (open_tx, open_rx) = watch::channel(true);
        let open_tx = Arc::new(open_tx);
        let reader = tokio::spawn(drain(reader, Arc::clone(&open_tx)));

        Ok(Box::new(TungsteniteLink {
            writer,
            open_tx,
            open_rx,
            reader,
        }))
    }
}

/// An open connection. Incoming frames are read and discarded in the
/// background so close frames and pings are observed.
pub struct TungsteniteLink {
    writer: SplitSink<Socket, Message>,
    open_tx: Arc<watch::Sender<bool>>,
    open_rx: watch::Receiver<bool>,
    reader: JoinHandle<()>,
}

#[async_trait]
impl WebSocketLink for TungsteniteLink {
    async fn send_text(&mut self, text: &str) -> ApplicationResult<()> {
        if !self.is_open() {
            return Err(WebSocketError::NotConnected.into());
        }
        self.writer
            .send(Message::text(text.to_string()))
            .await
            .map_err(|e| WebSocketError::SendFailed(e.to_string()))?;
        Ok(())
    }

    async fn close(&mut self) -> ApplicationResult<()> {
        self.open_tx.send_replace(false);
        self.writer
            .close()
            .await
            .map_err(|e| WebSocketError::SendFailed(e.to_string()))?;
        Ok(())
    }

    fn is_open(&self) -> bool {
        *self.open_rx.borrow()
    }

    async fn closed(&mut self) {
        // Errors only if the sender is gone, which also means closed.
        let _ = self.open_rx.wait_for(|open| !*open).await;
    }
}

impl Drop for TungsteniteLink {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn drain(mut reader: SplitStream<Socket>, open: Arc<watch::Sender<bool>>) {
    while let Some(frame) = reader.next().await {
        match frame {
            Ok(Message::Close(frame)) => {
                debug!(?frame, "websocket closed by peer");
                break;
            }
            Ok(message) => debug!(len = message.len(), "websocket frame received"),
            Err(error) => {
                debug!(%error, "websocket read failed");
                break;
            }
        }
    }
    open.send_replace(false);
}
