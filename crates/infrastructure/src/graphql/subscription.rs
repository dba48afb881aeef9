//! GraphQL subscriptions over WebSocket.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use url::Url;

use super::documents::Document;
use super::error::GraphQlError;
use super::protocol::{ClientMessage, GRAPHQL_WS_PROTOCOL, ServerMessage, error_messages};
use super::wire::Response;

/// How long the server has to acknowledge `connection_init`.
const ACK_TIMEOUT: Duration = Duration::from_secs(10);

/// The only operation id this client ever uses; one socket per subscription.
const OPERATION_ID: &str = "1";

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One running subscription on its own socket.
pub struct GraphQlSubscription {
    socket: Socket,
    operation: &'static str,
    finished: bool,
}

impl GraphQlSubscription {
    /// Connects, completes the handshake and starts `document`.
    ///
    /// # Errors
    /// Returns an error if the socket cannot be opened, the server refuses
    /// the session, or no acknowledgement arrives in time.
    pub async fn start(ws_url: &Url, document: Document) -> Result<Self, GraphQlError> {
        let mut request = ws_url.as_str().into_client_request()?;
        request.headers_mut().insert(
            SEC_WEBSOCKET_PROTOCOL,
            HeaderValue::from_static(GRAPHQL_WS_PROTOCOL),
        );

        let (socket, _) = tokio_tungstenite::connect_async(request).await?;
        debug!(url = %ws_url, "subscription socket open");

        let mut subscription = Self {
            socket,
            operation: document.operation_name,
            finished: false,
        };
        subscription.send(&ClientMessage::init()).await?;
        tokio::time::timeout(ACK_TIMEOUT, subscription.await_ack())
            .await
            .map_err(|_| GraphQlError::Protocol("connection_ack timed out".to_string()))??;

        subscription
            .send(&ClientMessage::Start {
                id: OPERATION_ID.to_string(),
                payload: document.into(),
            })
            .await?;
        info!(operation = document.operation_name, "subscription started");

        Ok(subscription)
    }

    /// Waits for the next result and decodes its `data`.
    ///
    /// Keep-alives are skipped. Returns `None` once the operation has
    /// completed or the socket has closed. A transport failure or an
    /// `error` frame is returned once and ends the subscription; a data
    /// frame carrying GraphQL errors does not.
    pub async fn next_data<T: DeserializeOwned>(&mut self) -> Option<Result<T, GraphQlError>> {
        while !self.finished {
            let message = match self.next_message().await? {
                Ok(message) => message,
                Err(error) => {
                    self.finished = true;
                    return Some(Err(error));
                }
            };

            match message {
                ServerMessage::Data { payload, .. } => {
                    return Some(
                        serde_json::from_value::<Response<T>>(payload)
                            .map_err(GraphQlError::from)
                            .and_then(Response::into_data),
                    );
                }
                ServerMessage::Error { payload, .. } | ServerMessage::ConnectionError { payload } => {
                    self.finished = true;
                    return Some(Err(GraphQlError::Rejected(error_messages(&payload))));
                }
                ServerMessage::Complete { .. } => {
                    info!(operation = self.operation, "subscription completed by server");
                    self.finished = true;
                }
                ServerMessage::Ka | ServerMessage::ConnectionAck | ServerMessage::Unknown => {}
            }
        }
        None
    }

    /// Stops the operation and closes the socket.
    ///
    /// # Errors
    /// Returns an error if the goodbye frames could not be written.
    pub async fn stop(mut self) -> Result<(), GraphQlError> {
        if !self.finished {
            self.send(&ClientMessage::Stop {
                id: OPERATION_ID.to_string(),
            })
            .await?;
        }
        self.send(&ClientMessage::ConnectionTerminate).await?;
        self.socket.close(None).await?;
        info!(operation = self.operation, "subscription stopped");
        Ok(())
    }

    async fn await_ack(&mut self) -> Result<(), GraphQlError> {
        loop {
            match self.next_message().await {
                Some(Ok(ServerMessage::ConnectionAck)) => return Ok(()),
                Some(Ok(ServerMessage::ConnectionError { payload })) => {
                    return Err(GraphQlError::Rejected(error_messages(&payload)));
                }
                Some(Ok(other)) => debug!(?other, "frame before connection_ack"),
                Some(Err(error)) => return Err(error),
                None => {
                    return Err(GraphQlError::Protocol(
                        "socket closed before connection_ack".to_string(),
                    ));
                }
            }
        }
    }

    /// Reads the next protocol frame. `None` when the socket is closed.
    async fn next_message(&mut self) -> Option<Result<ServerMessage, GraphQlError>> {
        loop {
            let frame = match self.socket.next().await? {
                Ok(frame) => frame,
                Err(error) => return Some(Err(error.into())),
            };

            match frame {
                Message::Text(text) => {
                    debug!(frame = %text.as_str(), "graphql-ws frame");
                    return Some(ServerMessage::from_text(text.as_str()).map_err(|e| {
                        warn!(error = %e, "undecodable graphql-ws frame");
                        GraphQlError::Protocol(e.to_string())
                    }));
                }
                Message::Close(frame) => {
                    debug!(?frame, "subscription socket closed by server");
                    return None;
                }
                Message::Binary(_) | Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
    }

    async fn send(&mut self, message: &ClientMessage) -> Result<(), GraphQlError> {
        let text = message.to_text()?;
        self.socket.send(Message::text(text)).await?;
        Ok(())
    }
}
