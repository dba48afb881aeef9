//! A fake capture server for integration tests.
//!
//! Serves the GraphQL queries and mutation over HTTP, the `graphql-ws`
//! subscription on the same path, a capture route for outbound requests
//! and a WebSocket sink for the send panel.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{HeaderMap, Method};
use axum::response::{IntoResponse, Json};
use axum::routing::{any, get, post};
use serde_json::{Value, json};
use tokio::sync::{Mutex, Notify, broadcast};

/// Upper bound for anything a test waits on.
pub const WAIT: Duration = Duration::from_secs(5);

/// An outbound request as the fake capture endpoint saw it.
#[derive(Debug, Clone)]
pub struct Received {
    pub method: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Shared state of the fake server.
pub struct FakeServer {
    pub requests: Mutex<Vec<Value>>,
    pub clear_calls: AtomicUsize,
    pub reject_queries: AtomicBool,
    pub live: broadcast::Sender<Value>,
    pub subscribed: Notify,
    pub stopped: Notify,
    pub terminated: AtomicBool,
    pub captured: Mutex<Vec<Received>>,
    pub socket_frames: Mutex<Vec<String>>,
}

impl FakeServer {
    pub fn new(requests: Vec<Value>) -> Arc<Self> {
        let (live, _) = broadcast::channel(16);
        Arc::new(Self {
            requests: Mutex::new(requests),
            clear_calls: AtomicUsize::new(0),
            reject_queries: AtomicBool::new(false),
            live,
            subscribed: Notify::new(),
            stopped: Notify::new(),
            terminated: AtomicBool::new(false),
            captured: Mutex::new(Vec::new()),
            socket_frames: Mutex::new(Vec::new()),
        })
    }

    /// Publishes a captured request to live subscribers.
    pub fn publish(&self, request: Value) {
        self.live.send(request).unwrap();
    }

    /// Binds an ephemeral port and serves in the background.
    pub async fn spawn(self: &Arc<Self>) -> SocketAddr {
        let app = Router::new()
            .route("/query", post(graphql).get(subscribe))
            .route("/socket", get(socket_sink))
            .route("/capture", any(capture))
            .with_state(Arc::clone(self));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }
}

/// A captured request as the server would send it.
pub fn captured(id: &str, method: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "fields": { "method": method, "url": "/hook?debug=1", "time": 1250 },
        "headers": { "Content-Type": ["application/json"], "Accept": ["*/*"] },
        "param_fields": {
            "form": null,
            "query": { "debug": "1" },
            "json": null,
            "json_array": null,
            "message": null
        },
        "created_at": created_at
    })
}

async fn graphql(State(server): State<Arc<FakeServer>>, Json(body): Json<Value>) -> Json<Value> {
    if server.reject_queries.load(Ordering::SeqCst) {
        return Json(json!({ "errors": [{ "message": "boom" }], "data": null }));
    }

    let response = match body["operationName"].as_str() {
        Some("GetServerInfo") => json!({ "data": { "serverInfo": {
            "request_address": "localhost",
            "request_port": 8080,
            "web_port": 8081,
            "build_info": { "version": "0.2.1" },
            "protocol": "http"
        }}}),
        Some("GetAllRequests") => {
            let requests = server.requests.lock().await.clone();
            json!({ "data": { "requests": requests } })
        }
        Some("ClearRequests") => {
            server.clear_calls.fetch_add(1, Ordering::SeqCst);
            server.requests.lock().await.clear();
            json!({ "data": { "clearRequests": true } })
        }
        other => json!({ "errors": [{ "message": format!("unknown operation {other:?}") }] }),
    };
    Json(response)
}

async fn subscribe(State(server): State<Arc<FakeServer>>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.protocols(["graphql-ws"])
        .on_upgrade(move |socket| graphql_ws(socket, server))
}

async fn graphql_ws(mut socket: WebSocket, server: Arc<FakeServer>) {
    let mut live = server.live.subscribe();
    let mut operation: Option<String> = None;

    loop {
        tokio::select! {
            frame = socket.recv() => {
                let Some(Ok(Message::Text(text))) = frame else { break };
                let message: Value = serde_json::from_str(text.as_str()).unwrap();
                match message["type"].as_str() {
                    Some("connection_init") => {
                        send_json(&mut socket, json!({ "type": "connection_ack" })).await;
                        send_json(&mut socket, json!({ "type": "ka" })).await;
                    }
                    Some("start") => {
                        assert_eq!(message["payload"]["operationName"], "GetRequests");
                        operation = message["id"].as_str().map(str::to_string);
                        server.subscribed.notify_one();
                    }
                    Some("stop") => {
                        operation = None;
                        server.stopped.notify_one();
                    }
                    Some("connection_terminate") => {
                        server.terminated.store(true, Ordering::SeqCst);
                        break;
                    }
                    _ => {}
                }
            }
            event = live.recv() => {
                let Ok(request) = event else { break };
                if let Some(id) = &operation {
                    let frame = json!({
                        "type": "data",
                        "id": id,
                        "payload": { "data": { "request": request } }
                    });
                    send_json(&mut socket, frame).await;
                }
            }
        }
    }
}

async fn send_json(socket: &mut WebSocket, value: Value) {
    socket
        .send(Message::Text(value.to_string().into()))
        .await
        .unwrap();
}

async fn capture(
    State(server): State<Arc<FakeServer>>,
    method: Method,
    headers: HeaderMap,
    body: String,
) -> &'static str {
    server.captured.lock().await.push(Received {
        method: method.to_string(),
        content_type: headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    "ok"
}

/// Records text frames; closes the connection when told to.
async fn socket_sink(State(server): State<Arc<FakeServer>>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |mut socket| async move {
        while let Some(Ok(frame)) = socket.recv().await {
            if let Message::Text(text) = frame {
                if text.as_str() == "close me" {
                    let _ = socket.send(Message::Close(None)).await;
                    break;
                }
                server.socket_frames.lock().await.push(text.to_string());
            }
        }
    })
}
