//! UI Bridge Module
//!
//! Defines the communication protocol between the console input and the
//! async runtime: user intents come in as [`UiCommand`]s, state changes go
//! out as [`UiUpdate`]s.

use rhole_domain::{
    ConnectionState, DomainError, FailureKind, LoadState, Method, MethodFilter, OutboundRequest,
    RequestId, ServerInfo, WebSocketMessage,
};

/// Commands sent from the console to the async runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// Redraw the whole feed.
    ShowFeed,

    /// Redraw the header.
    ShowInfo,

    /// User picked a method filter.
    SelectFilter(MethodFilter),

    /// User clicked "Hide Details" / "Show Details".
    ToggleAllDetails,

    /// User toggled the details of one card.
    ToggleDetails(RequestTarget),

    /// User clicked "Clear Requests".
    ClearRequests,

    /// Show the send panel for the server's protocol.
    ShowPanel,

    /// Change the method of the HTTP send panel.
    SetMethod(Method),

    /// Change the target URL of the active send panel.
    SetUrl(String),

    /// Change the body of the active send panel.
    SetBody(String),

    /// Send from the active panel.
    Send,

    /// Open the WebSocket panel connection.
    Connect,

    /// Close the WebSocket panel connection.
    Disconnect,

    /// Print the command reference.
    Help,

    /// Leave the console.
    Quit,
}

/// How a command refers to a request card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTarget {
    /// 1-based position in the visible list.
    Position(usize),
    /// Server-assigned id.
    Id(RequestId),
}

/// Updates sent from the async runtime to the console.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// Server info finished loading (or failed).
    ServerInfo(LoadState<ServerInfo>),

    /// The feed changed enough to redraw it.
    Feed,

    /// A request arrived on the live stream.
    Captured {
        /// Id of the new request.
        id: RequestId,
    },

    /// The HTTP send panel fired a request.
    Sent(OutboundRequest),

    /// The WebSocket panel changed connection state.
    Connection(ConnectionState),

    /// The WebSocket panel sent a message.
    MessageSent(WebSocketMessage),

    /// Show the active send panel.
    Panel,

    /// Show an error message.
    Error {
        /// Short headline.
        title: String,
        /// Details.
        message: String,
        /// Category, for the follow-up hints.
        kind: Option<FailureKind>,
    },

    /// Show the command reference.
    Help,
}

/// Errors produced while parsing a console line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The first word is not a command.
    #[error("unknown command '{0}', type 'help' for the list")]
    Unknown(String),

    /// A required argument was left out.
    #[error("'{command}' needs {argument}")]
    MissingArgument {
        /// The command that was typed.
        command: &'static str,
        /// What is missing.
        argument: &'static str,
    },

    /// An argument did not parse.
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Command reference printed by `help`.
pub const HELP: &str = "\
Commands:
  list                 redraw the feed
  info                 show server info
  filter <ALL|METHOD>  show only requests with this method
  details              toggle details on every card
  toggle <n|id>        toggle details on one card
  clear                clear all requests
  panel                show the send panel
  method <METHOD>      set the HTTP send method
  url <URL>            set the send URL
  body <TEXT>          set the send body
  send                 send the request or message
  connect              open the WebSocket connection
  disconnect           close the WebSocket connection
  help                 show this help
  quit                 exit";

/// Parses one console line.
///
/// Returns `Ok(None)` for a blank line.
///
/// # Errors
///
/// Returns [`CommandError`] for an unknown command or a bad argument.
pub fn parse_command(line: &str) -> Result<Option<UiCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let command = match word.to_lowercase().as_str() {
        "list" | "ls" => UiCommand::ShowFeed,
        "info" => UiCommand::ShowInfo,
        "filter" => UiCommand::SelectFilter(required("filter", "a method or ALL", rest)?.parse()?),
        "details" => UiCommand::ToggleAllDetails,
        "toggle" => UiCommand::ToggleDetails(parse_target(required("toggle", "a card", rest)?)),
        "clear" => UiCommand::ClearRequests,
        "panel" => UiCommand::ShowPanel,
        "method" => UiCommand::SetMethod(required("method", "a method", rest)?.parse()?),
        "url" => UiCommand::SetUrl(required("url", "a URL", rest)?.to_string()),
        "body" => UiCommand::SetBody(rest.to_string()),
        "send" => UiCommand::Send,
        "connect" => UiCommand::Connect,
        "disconnect" => UiCommand::Disconnect,
        "help" | "?" => UiCommand::Help,
        "quit" | "exit" | "q" => UiCommand::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };

    Ok(Some(command))
}

fn required<'a>(
    command: &'static str,
    argument: &'static str,
    rest: &'a str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

fn parse_target(value: &str) -> RequestTarget {
    value
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .map_or_else(|| RequestTarget::Id(value.into()), RequestTarget::Position)
}
