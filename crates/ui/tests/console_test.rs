//! Console tests against mock ports.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::io::{self, Write};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rhole_application::ports::{
    FixedClock, InspectorApi, OutboundHttp, RequestSubscription, SubscriptionSink,
    WebSocketConnector, WebSocketLink,
};
use rhole_application::{ApplicationError, ApplicationResult};
use rhole_domain::{
    CapturedRequest, Method, MethodFilter, OutboundRequest, RequestFields, ServerInfo, Transport,
};
use rhole_ui::{Console, FeedView, RequestTarget, UiCommand};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::time::timeout;
use url::Url;

const WAIT: Duration = Duration::from_secs(5);

fn at(second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, second).unwrap()
}

fn request(id: &str, method: Method, url: &str, second: u32) -> CapturedRequest {
    CapturedRequest::new(id, RequestFields::new(method, url), at(second))
}

#[derive(Clone, Default)]
struct SharedOut(Arc<Mutex<Vec<u8>>>);

impl SharedOut {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct MockApi {
    info: Option<ServerInfo>,
    requests: Vec<CapturedRequest>,
    clear_ok: bool,
    clears: AtomicUsize,
    sink: Mutex<Option<SubscriptionSink>>,
}

impl MockApi {
    fn new(info: Option<ServerInfo>, requests: Vec<CapturedRequest>) -> Self {
        Self {
            info,
            requests,
            clear_ok: true,
            clears: AtomicUsize::new(0),
            sink: Mutex::new(None),
        }
    }

    async fn publish(&self, request: CapturedRequest) {
        let events = self.sink.lock().unwrap().as_ref().unwrap().events.clone();
        events.send(Ok(request)).await.unwrap();
    }
}

#[async_trait]
impl InspectorApi for MockApi {
    async fn server_info(&self) -> ApplicationResult<ServerInfo> {
        self.info
            .clone()
            .ok_or_else(|| ApplicationError::TransportFailure("refused".to_string()))
    }

    async fn requests(&self) -> ApplicationResult<Vec<CapturedRequest>> {
        Ok(self.requests.clone())
    }

    async fn clear_requests(&self) -> ApplicationResult<bool> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        Ok(self.clear_ok)
    }

    async fn subscribe_requests(&self) -> ApplicationResult<RequestSubscription> {
        let (sink, subscription) = RequestSubscription::channel(8);
        *self.sink.lock().unwrap() = Some(sink);
        Ok(subscription)
    }
}

#[derive(Default)]
struct MockHttp {
    sent: Mutex<Vec<OutboundRequest>>,
}

#[async_trait]
impl OutboundHttp for MockHttp {
    async fn send(&self, request: &OutboundRequest) -> ApplicationResult<()> {
        self.sent.lock().unwrap().push(request.clone());
        Ok(())
    }
}

#[derive(Default)]
struct Wire {
    frames: Mutex<Vec<String>>,
    open: AtomicBool,
}

struct MockLink(Arc<Wire>);

#[async_trait]
impl WebSocketLink for MockLink {
    async fn send_text(&mut self, text: &str) -> ApplicationResult<()> {
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
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[derive(Default)]
struct MockConnector {
    wire: Arc<Wire>,
}

#[async_trait]
impl WebSocketConnector for MockConnector {
    async fn connect(&self, _url: &Url) -> ApplicationResult<Box<dyn WebSocketLink>> {
        self.wire.open.store(true, Ordering::SeqCst);
        Ok(Box::new(MockLink(Arc::clone(&self.wire))))
    }
}

type TestConsole = Console<MockApi, MockHttp, MockConnector, SharedOut>;

struct Harness {
    api: Arc<MockApi>,
    http: Arc<MockHttp>,
    connector: Arc<MockConnector>,
    out: SharedOut,
}

impl Harness {
    fn new(api: MockApi) -> (Self, TestConsole) {
        let harness = Self {
            api: Arc::new(api),
            http: Arc::new(MockHttp::default()),
            connector: Arc::new(MockConnector::default()),
            out: SharedOut::default(),
        };
        let console = Console::new(
            Arc::clone(&harness.api),
            Arc::clone(&harness.http),
            Arc::clone(&harness.connector),
            Arc::new(FixedClock(at(0) + chrono::Duration::minutes(5))),
            harness.out.clone(),
        );
        (harness, console)
    }
}

fn http_server() -> ServerInfo {
    ServerInfo::new(Transport::Http, "localhost", 8080).with_build_info("version", "0.2.1")
}

fn ws_server() -> ServerInfo {
    ServerInfo::new(Transport::Ws, "localhost", 8080)
}

fn get_and_post() -> Vec<CapturedRequest> {
    vec![
        request("get", Method::Get, "/get", 0),
        request("post", Method::Post, "/post", 30),
    ]
}

#[tokio::test]
async fn test_boot_prints_header_and_feed() {
    let (harness, mut console) = Harness::new(MockApi::new(Some(http_server()), get_and_post()));

    console.boot().await.unwrap();

    let text = harness.out.text();
    assert!(text.starts_with("Request Hole 0.2.1\nListening on: http://localhost:8080\n"));
    assert!(text.contains("2 Requests  [Filter: ALL] [Hide Details] [Clear Requests]"));
    let post = text.find("[1] POST  4 minutes ago").unwrap();
    let get = text.find("[2] GET  5 minutes ago").unwrap();
    assert!(post < get);
    assert_eq!(console.failures(), 0);
}

#[tokio::test]
async fn test_header_failure() {
    let (harness, mut console) = Harness::new(MockApi::new(None, Vec::new()));

    assert!(!console.load_header().await.unwrap());
    assert_eq!(harness.out.text(), "Request Hole\nFailed to load server info.\n");

    console.handle(UiCommand::Send).await.unwrap();
    assert!(harness.out.text().contains("No send panel."));
    assert_eq!(console.failures(), 1);
}

#[tokio::test]
async fn test_filter_and_details_commands() {
    let (harness, mut console) = Harness::new(MockApi::new(Some(http_server()), get_and_post()));
    console.boot().await.unwrap();

    console
        .handle(UiCommand::SelectFilter(MethodFilter::Only(Method::Post)))
        .await
        .unwrap();
    assert!(harness.out.text().ends_with(
        "1 Request  [Filter: POST] [Hide Details] [Clear Requests]\n\
         [1] POST  4 minutes ago\n    URL  /post\n    0 HEADERS\n    NO PARAMS\n"
    ));

    console
        .handle(UiCommand::ToggleDetails(RequestTarget::Position(1)))
        .await
        .unwrap();
    assert!(harness.out.text().ends_with(
        "1 Request  [Filter: POST] [Hide Details] [Clear Requests]\n\
         [1] POST  4 minutes ago\n    URL  /post\n"
    ));

    console.handle(UiCommand::ToggleAllDetails).await.unwrap();
    console.handle(UiCommand::ToggleAllDetails).await.unwrap();
    assert!(harness.out.text().ends_with("    NO PARAMS\n"));
    assert!(console.view().details_visible(&"post".into()));
}

#[tokio::test]
async fn test_toggle_unknown_card() {
    let (harness, mut console) = Harness::new(MockApi::new(Some(http_server()), get_and_post()));
    console.boot().await.unwrap();

    console
        .handle(UiCommand::ToggleDetails(RequestTarget::Position(3)))
        .await
        .unwrap();
    console
        .handle(UiCommand::ToggleDetails(RequestTarget::Id("nope".into())))
        .await
        .unwrap();

    let text = harness.out.text();
    assert!(text.contains("No such request.\n    no card at position 3"));
    assert!(text.contains("no request with id nope"));
    assert_eq!(console.failures(), 2);
}

#[tokio::test]
async fn test_clear() {
    let (harness, mut console) = Harness::new(MockApi::new(Some(http_server()), get_and_post()));
    console.boot().await.unwrap();

    console.handle(UiCommand::ClearRequests).await.unwrap();

    assert_eq!(harness.api.clears.load(Ordering::SeqCst), 1);
    assert!(harness
        .out
        .text()
        .ends_with("0 Requests  [Filter: ALL] [Hide Details] [Clear Requests]\n"));
    assert_eq!(console.failures(), 0);
}

#[tokio::test]
async fn test_clear_failure_is_shown() {
    let mut api = MockApi::new(Some(http_server()), get_and_post());
    api.clear_ok = false;
    let (harness, mut console) = Harness::new(api);
    console.boot().await.unwrap();

    console.handle(UiCommand::ClearRequests).await.unwrap();

    let text = harness.out.text();
    assert!(text.contains("0 Requests"));
    assert!(text.contains("Failed to clear requests on the server."));
    assert!(text.ends_with("    - Retry the clear once the server is reachable\n"));
    assert_eq!(console.failures(), 1);
}

#[tokio::test]
async fn test_http_panel_send() {
    let (harness, mut console) = Harness::new(MockApi::new(Some(http_server()), Vec::new()));
    console.load_header().await.unwrap();

    console.handle(UiCommand::SetMethod(Method::Post)).await.unwrap();
    console.handle(UiCommand::Send).await.unwrap();

    let sent = harness.http.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::Post);
    assert_eq!(sent[0].url.as_str(), "http://localhost:8080/");
    assert_eq!(sent[0].body.as_deref(), Some(r#"{"hello":"world"}"#));
    assert!(harness.out.text().ends_with("Sent POST http://localhost:8080/\n"));

    console.handle(UiCommand::Connect).await.unwrap();
    assert!(harness.out.text().contains("Not available."));
}

#[tokio::test]
async fn test_websocket_panel() {
    let (harness, mut console) = Harness::new(MockApi::new(Some(ws_server()), Vec::new()));
    console.load_header().await.unwrap();

    console
        .handle(UiCommand::SetBody("early".to_string()))
        .await
        .unwrap();
    assert!(harness.out.text().contains("Not connected"));

    console.handle(UiCommand::Connect).await.unwrap();
    assert!(harness.out.text().ends_with("WebSocket Connected\n"));

    console.handle(UiCommand::Send).await.unwrap();
    console
        .handle(UiCommand::SetBody("second".to_string()))
        .await
        .unwrap();
    console.handle(UiCommand::Send).await.unwrap();
    assert!(harness.out.text().ends_with("Sent 6 B message (2 total)\n"));
    assert_eq!(
        harness.connector.wire.frames.lock().unwrap().clone(),
        vec![r#"{"hello":"world"}"#.to_string(), "second".to_string()]
    );

    console.handle(UiCommand::Disconnect).await.unwrap();
    assert!(harness.out.text().ends_with("WebSocket Disconnected\n"));
    assert!(harness.http.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_help_and_quit() {
    let (harness, mut console) = Harness::new(MockApi::new(Some(http_server()), Vec::new()));

    console.handle(UiCommand::Help).await.unwrap();
    let text = harness.out.text();
    assert!(text.starts_with("Commands:\n"));
    assert!(text.ends_with("Filters: ALL GET POST PUT PATCH DELETE HEAD OPTIONS RECEIVE\n"));

    assert_eq!(
        console.handle(UiCommand::Quit).await.unwrap(),
        ControlFlow::Break(())
    );
}

#[tokio::test]
async fn test_run_prints_live_requests() {
    let (harness, mut console) = Harness::new(MockApi::new(Some(http_server()), get_and_post()));
    let mut console = {
        console.boot().await.unwrap();
        console.with_view(FeedView::new().with_details(false))
    };

    let (mut input, reader) = tokio::io::duplex(64);
    let task = tokio::spawn(async move {
        console.run(BufReader::new(reader)).await.unwrap();
        console
    });

    harness
        .api
        .publish(request("live", Method::Put, "/live", 59))
        .await;
    timeout(WAIT, async {
        while !harness.out.text().contains("3 Requests") {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    input.write_all(b"bogus\nquit\n").await.unwrap();
    let console = timeout(WAIT, task).await.unwrap().unwrap();

    let text = harness.out.text();
    assert!(text.contains("[1] PUT  4 minutes ago\n    URL  /live\n3 Requests"));
    assert!(text.contains("Unknown command.\n    unknown command 'bogus'"));
    assert_eq!(console.failures(), 1);
    assert!(harness.api.sink.lock().unwrap().as_ref().unwrap().events.is_closed());
}
