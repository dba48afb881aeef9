//! Interactive console.
//!
//! Owns the feed, the send panels and the view state. Console lines are
//! parsed into [`UiCommand`]s; every state change is turned into a
//! [`UiUpdate`] and rendered to the output.

use std::io::{self, Write};
use std::ops::ControlFlow;
use std::sync::Arc;

use rhole_application::ports::{Clock, InspectorApi, OutboundHttp, WebSocketConnector};
use rhole_application::{
    ApplicationError, ApplicationResult, LoadServerInfo, RequestFeed, SendHttpRequest,
    WebSocketSession,
};
use rhole_domain::{
    FailureKind, FeedPhase, HttpSendDraft, LoadState, MethodFilter, RequestId, ServerInfo,
    Transport, WebSocketPanel,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::bridge::{HELP, RequestTarget, UiCommand, UiUpdate, parse_command};
use crate::render;
use crate::state::FeedView;

enum Event {
    Line(Option<String>),
    Feed(Option<ApplicationResult<RequestId>>),
    SocketClosed,
}

/// The console and everything it drives.
pub struct Console<A, H, C, W>
where
    A: InspectorApi,
    H: OutboundHttp,
    C: WebSocketConnector,
    W: Write + Send,
{
    api: Arc<A>,
    feed: RequestFeed<Arc<A>>,
    sender: SendHttpRequest<H>,
    session: WebSocketSession<C>,
    clock: Arc<dyn Clock>,
    header: LoadState<ServerInfo>,
    view: FeedView,
    draft: HttpSendDraft,
    failures: usize,
    out: W,
}

impl<A, H, C, W> Console<A, H, C, W>
where
    A: InspectorApi,
    H: OutboundHttp,
    C: WebSocketConnector,
    W: Write + Send,
{
    /// Creates a console writing to `out`. Nothing is loaded yet.
    pub fn new(api: Arc<A>, http: Arc<H>, connector: Arc<C>, clock: Arc<dyn Clock>, out: W) -> Self {
        Self {
            feed: RequestFeed::new(Arc::clone(&api)),
            api,
            sender: SendHttpRequest::new(http),
            session: WebSocketSession::new(connector, WebSocketPanel::new("")),
            clock,
            header: LoadState::Loading,
            view: FeedView::new(),
            draft: HttpSendDraft::default(),
            failures: 0,
            out,
        }
    }

    /// Replaces the initial view state.
    #[must_use]
    pub fn with_view(mut self, view: FeedView) -> Self {
        self.view = view;
        self
    }

    /// Number of errors shown so far.
    #[must_use]
    pub const fn failures(&self) -> usize {
        self.failures
    }

    /// The output written so far.
    #[must_use]
    pub const fn output(&self) -> &W {
        &self.out
    }

    /// The view state.
    #[must_use]
    pub const fn view(&self) -> &FeedView {
        &self.view
    }

    /// Loads server info, seeds the send panels from it and prints the
    /// header. Returns whether it loaded.
    ///
    /// # Errors
    /// Returns an error if the output cannot be written.
    pub async fn load_header(&mut self) -> io::Result<bool> {
        let header = LoadServerInfo::new(Arc::clone(&self.api)).execute().await;
        if let Some(info) = header.value() {
            self.draft = HttpSendDraft::for_server(info);
            if let Err(error) = self.session.set_url(info.listening_url()) {
                warn!(%error, "could not aim the websocket panel");
            }
        }
        let loaded = header.value().is_some();
        self.apply_update(UiUpdate::ServerInfo(header))?;
        Ok(loaded)
    }

    /// Loads the header, subscribes to the live stream, loads the
    /// snapshot and prints the feed.
    ///
    /// # Errors
    /// Returns an error if the output cannot be written.
    pub async fn boot(&mut self) -> io::Result<()> {
        self.load_header().await?;
        let started = self.feed.start().await;
        self.apply_update(UiUpdate::Feed)?;

        // A failed snapshot already shows in the feed itself.
        if let Err(error) = started
            && !matches!(self.feed.state().phase(), FeedPhase::Failed { .. })
        {
            self.report(&error)?;
        }
        Ok(())
    }

    /// Loads the snapshot once, without the live stream, and prints it.
    ///
    /// # Errors
    /// Returns an error if the output cannot be written.
    pub async fn snapshot(&mut self) -> io::Result<()> {
        let loaded = self.feed.load().await;
        self.apply_update(UiUpdate::Feed)?;
        if loaded.is_err() {
            self.failures += 1;
        }
        Ok(())
    }

    /// Reads commands from `input` until `quit` or end of input, while
    /// printing live requests and socket closes as they happen.
    ///
    /// # Errors
    /// Returns an error if reading input or writing output fails.
    pub async fn run<R>(&mut self, input: R) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        let mut lines = input.lines();

        loop {
            let event = tokio::select! {
                line = lines.next_line() => Event::Line(line?),
                event = self.feed.next_event(), if self.feed.is_subscribed() => Event::Feed(event),
                () = self.session.closed() => Event::SocketClosed,
            };

            match event {
                Event::Line(None) => break,
                Event::Line(Some(line)) => match parse_command(&line) {
                    Ok(Some(command)) => {
                        if self.handle(command).await?.is_break() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(error) => self.apply_update(UiUpdate::Error {
                        title: "Unknown command.".to_string(),
                        message: error.to_string(),
                        kind: None,
                    })?,
                },
                Event::Feed(Some(Ok(id))) => self.apply_update(UiUpdate::Captured { id })?,
                Event::Feed(Some(Err(error))) => self.report(&error)?,
                Event::Feed(None) => {}
                Event::SocketClosed => {
                    self.apply_update(UiUpdate::Connection(self.session.state()))?;
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// Runs one command. `Break` means the console should exit.
    ///
    /// # Errors
    /// Returns an error if the output cannot be written.
    pub async fn handle(&mut self, command: UiCommand) -> io::Result<ControlFlow<()>> {
        debug!(?command, "console command");

        let update = match command {
            UiCommand::ShowFeed => UiUpdate::Feed,
            UiCommand::ShowInfo => UiUpdate::ServerInfo(self.header.clone()),
            UiCommand::SelectFilter(filter) => {
                self.view.select_filter(filter);
                UiUpdate::Feed
            }
            UiCommand::ToggleAllDetails => {
                self.view.toggle_all_details();
                UiUpdate::Feed
            }
            UiCommand::ToggleDetails(target) => match self.resolve(&target) {
                Some(id) => {
                    self.view.toggle_details(&id);
                    UiUpdate::Feed
                }
                None => UiUpdate::Error {
                    title: "No such request.".to_string(),
                    message: describe(&target),
                    kind: None,
                },
            },
            UiCommand::ClearRequests => {
                let cleared = self.feed.clear().await;
                self.view.retain(self.feed.state());
                self.apply_update(UiUpdate::Feed)?;
                match cleared {
                    Ok(()) => return Ok(ControlFlow::Continue(())),
                    Err(error) => error_update(&error),
                }
            }
            UiCommand::ShowPanel => UiUpdate::Panel,
            UiCommand::Help => UiUpdate::Help,
            UiCommand::Quit => return Ok(ControlFlow::Break(())),
            command => self.handle_panel(command).await,
        };

        self.apply_update(update)?;
        Ok(ControlFlow::Continue(()))
    }

    /// Closes the live stream and any open socket.
    pub async fn shutdown(&mut self) {
        self.feed.unmount();
        if let Err(error) = self.session.disconnect().await {
            warn!(%error, "websocket close failed");
        }
    }

    async fn handle_panel(&mut self, command: UiCommand) -> UiUpdate {
        let Some(transport) = self.header.value().map(|info| info.protocol) else {
            return UiUpdate::Error {
                title: "No send panel.".to_string(),
                message: "Server info is not loaded.".to_string(),
                kind: Some(FailureKind::LoadFailure),
            };
        };

        let result = match (transport, command) {
            (Transport::Http, UiCommand::SetMethod(method)) => {
                self.draft.method = method;
                Ok(UiUpdate::Panel)
            }
            (Transport::Http, UiCommand::SetUrl(url)) => {
                self.draft.url = url;
                Ok(UiUpdate::Panel)
            }
            (Transport::Http, UiCommand::SetBody(body)) => {
                self.draft.body = body;
                Ok(UiUpdate::Panel)
            }
            (Transport::Http, UiCommand::Send) => {
                self.sender.execute(&self.draft).await.map(UiUpdate::Sent)
            }
            (Transport::Ws, UiCommand::SetUrl(url)) => {
                self.session.set_url(url).map(|()| UiUpdate::Panel)
            }
            (Transport::Ws, UiCommand::SetBody(body)) => {
                self.session.set_body(body).map(|()| UiUpdate::Panel)
            }
            (Transport::Ws, UiCommand::Send) => self.session.send().await.map(UiUpdate::MessageSent),
            (Transport::Ws, UiCommand::Connect) => self
                .session
                .connect()
                .await
                .map(|()| UiUpdate::Connection(self.session.state())),
            (Transport::Ws, UiCommand::Disconnect) => self
                .session
                .disconnect()
                .await
                .map(|()| UiUpdate::Connection(self.session.state())),
            (transport, command) => {
                return UiUpdate::Error {
                    title: "Not available.".to_string(),
                    message: format!(
                        "'{}' is not part of the {} panel",
                        command_name(&command),
                        transport.send_title()
                    ),
                    kind: None,
                };
            }
        };

        result.unwrap_or_else(|error| error_update(&error))
    }

    fn resolve(&self, target: &RequestTarget) -> Option<RequestId> {
        let feed = self.feed.state();
        match target {
            RequestTarget::Position(position) => self
                .view
                .visible(feed)
                .get(position.checked_sub(1)?)
                .map(|request| request.id.clone()),
            RequestTarget::Id(id) => feed.contains(id).then(|| id.clone()),
        }
    }

    fn report(&mut self, error: &ApplicationError) -> io::Result<()> {
        self.apply_update(error_update(error))
    }

    /// Renders one update to the output.
    ///
    /// # Errors
    /// Returns an error if the output cannot be written.
    pub fn apply_update(&mut self, update: UiUpdate) -> io::Result<()> {
        let now = self.clock.now();

        let text = match update {
            UiUpdate::ServerInfo(header) => {
                self.header = header;
                render::render_header(&self.header)
            }
            UiUpdate::Feed => render::render_feed(self.feed.state(), &self.view, now),
            UiUpdate::Captured { id } => {
                let feed = self.feed.state();
                let visible = self.view.visible(feed);
                let card = visible
                    .iter()
                    .enumerate()
                    .find(|(_, request)| request.id == id)
                    .map(|(index, request)| {
                        render::render_request(index + 1, request, self.view.details_visible(&id), now)
                    });
                let toolbar = render::render_toolbar(feed, &self.view);
                match card {
                    Some(card) => format!("{card}\n{toolbar}"),
                    None => toolbar,
                }
            }
            UiUpdate::Sent(request) => format!("Sent {} {}", request.method, request.url),
            UiUpdate::Connection(state) => format!("WebSocket {}", state.as_str()),
            UiUpdate::MessageSent(message) => format!(
                "Sent {} message ({} total)",
                message.size_display(),
                self.session.panel().messages_sent()
            ),
            UiUpdate::Panel => match self.header.value().map(|info| info.protocol) {
                Some(Transport::Http) => render::render_http_panel(&self.draft),
                Some(Transport::Ws) => render::render_websocket_panel(self.session.panel()),
                None => render::render_header(&self.header),
            },
            UiUpdate::Error {
                title,
                message,
                kind,
            } => {
                self.failures += 1;
                render::render_error(&title, &message, kind)
            }
            UiUpdate::Help => {
                let filters: Vec<String> = MethodFilter::options()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                format!("{HELP}\nFilters: {}", filters.join(" "))
            }
        };

        writeln!(self.out, "{text}")?;
        self.out.flush()
    }
}

fn error_update(error: &ApplicationError) -> UiUpdate {
    let kind = error.kind();
    UiUpdate::Error {
        title: kind
            .as_ref()
            .map_or("Something went wrong.", FailureKind::title)
            .to_string(),
        message: error.to_string(),
        kind,
    }
}

fn describe(target: &RequestTarget) -> String {
    match target {
        RequestTarget::Position(position) => format!("no card at position {position}"),
        RequestTarget::Id(id) => format!("no request with id {id}"),
    }
}

const fn command_name(command: &UiCommand) -> &'static str {
    match command {
        UiCommand::SetMethod(_) => "method",
        UiCommand::SetUrl(_) => "url",
        UiCommand::SetBody(_) => "body",
        UiCommand::Send => "send",
        UiCommand::Connect => "connect",
        UiCommand::Disconnect => "disconnect",
        _ => "command",
    }
}
