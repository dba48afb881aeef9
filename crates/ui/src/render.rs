//! Plain-text rendering of the console views.
//!
//! Every function here is pure: it takes state and returns the text to
//! print, so views are tested without a terminal.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use rhole_domain::{
    CapturedRequest, ConnectionState, FailureKind, FeedPhase, FeedState, Headers, HttpSendDraft,
    LoadState, ParamFields, ServerInfo, Transport, WebSocketPanel, format_time_ago,
    pluralize_with,
};
use serde_json::Value;

use crate::state::FeedView;

const INDENT: &str = "    ";

/// Renders the page header.
#[must_use]
pub fn render_header(info: &LoadState<ServerInfo>) -> String {
    match info {
        LoadState::Loading => "Request Hole\nLoading server info...".to_string(),
        LoadState::Failed { .. } => "Request Hole\nFailed to load server info.".to_string(),
        LoadState::Loaded { value } => {
            let title = match value.version() {
                "" => "Request Hole".to_string(),
                version => format!("Request Hole {version}"),
            };
            format!("{title}\nListening on: {}", value.listening_url())
        }
    }
}

/// Renders the feed toolbar and every visible card.
#[must_use]
pub fn render_feed(feed: &FeedState, view: &FeedView, now: DateTime<Utc>) -> String {
    let mut out = render_toolbar(feed, view);

    match feed.phase() {
        FeedPhase::Loading => {
            out.push_str("\nLoading requests...");
            return out;
        }
        FeedPhase::Failed { .. } => out.push_str("\nFailed to load."),
        FeedPhase::Ready => {}
    }

    for (index, request) in view.visible(feed).into_iter().enumerate() {
        out.push('\n');
        out.push_str(&render_request(
            index + 1,
            request,
            view.details_visible(&request.id),
            now,
        ));
    }
    out
}

/// Count heading and the three feed buttons.
#[must_use]
pub fn render_toolbar(feed: &FeedState, view: &FeedView) -> String {
    format!(
        "{}  [{}] [{}] [Clear Requests]",
        feed.count_label(view.filter()),
        view.filter_label(),
        view.details_label()
    )
}

/// Renders one request card.
#[must_use]
pub fn render_request(
    position: usize,
    request: &CapturedRequest,
    details: bool,
    now: DateTime<Utc>,
) -> String {
    let mut out = format!(
        "[{position}] {}  {}\n{INDENT}URL  {}",
        request.method(),
        format_time_ago(request.created_at, now),
        request.fields.url
    );
    if details {
        out.push('\n');
        out.push_str(&render_headers(&request.headers));
        out.push('\n');
        out.push_str(&render_params(&request.param_fields));
    }
    out
}

/// Header table: "N HEADERS" then one aligned row per name.
#[must_use]
pub fn render_headers(headers: &Headers) -> String {
    let heading = pluralize_with(headers.len(), "HEADER", "S");
    let rows: Vec<(&str, String)> = headers.display_rows().collect();
    table(&heading, rows.iter().map(|(name, value)| (*name, value.as_str())))
}

/// Params section: query, form, JSON or message, else "NO PARAMS".
#[must_use]
pub fn render_params(params: &ParamFields) -> String {
    match params {
        ParamFields::None => format!("{INDENT}NO PARAMS"),
        ParamFields::Query(query) => table(
            &pluralize_with(query.len(), "QUERY PARAM", "S"),
            query.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        ),
        ParamFields::Form(form) => table(
            &pluralize_with(form.len(), "FORM PARAM", "S"),
            form.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        ),
        ParamFields::Json(object) => json_block("JSON BODY", &Value::Object(object.clone())),
        ParamFields::JsonArray(items) => json_block("JSON BODY", &Value::Array(items.clone())),
        ParamFields::Message(body) => match params.message_json() {
            Some(json) => json_block("MESSAGE", &json),
            None => format!("{INDENT}MESSAGE\n{}", indent(body)),
        },
    }
}

/// Renders the HTTP send panel.
#[must_use]
pub fn render_http_panel(draft: &HttpSendDraft) -> String {
    let mut out = format!("{}\n", Transport::Http.send_title());
    let _ = writeln!(out, "{INDENT}Method  {}", draft.method);
    let _ = writeln!(out, "{INDENT}URL     {}", draft.url);
    if draft.method.sends_body() {
        let _ = write!(out, "{INDENT}Body    {}", draft.body);
    } else {
        let _ = write!(out, "{INDENT}Body    (not sent with {})", draft.method);
    }
    out
}

/// Renders the WebSocket send panel.
///
/// The body and the send action only appear once connected.
#[must_use]
pub fn render_websocket_panel(panel: &WebSocketPanel) -> String {
    let mut out = format!("{}\n", Transport::Ws.send_title());
    let _ = writeln!(out, "{INDENT}URL     {}", panel.url());
    let _ = write!(out, "{INDENT}Status  {}", panel.state().as_str());
    match (panel.state(), panel.body()) {
        (ConnectionState::Connected, Some(body)) => {
            let _ = write!(
                out,
                " ({}, {} sent)\n{INDENT}Body    {body}\n{INDENT}[Send] [Disconnect]",
                panel.duration_display(),
                panel.messages_sent()
            );
        }
        (ConnectionState::Connecting, _) => {}
        _ => {
            let _ = write!(out, "\n{INDENT}[Connect]");
        }
    }
    out
}

/// Renders an error with the hints for its category.
#[must_use]
pub fn render_error(title: &str, message: &str, kind: Option<FailureKind>) -> String {
    let mut out = format!("{title}\n{INDENT}{message}");
    for hint in kind.as_ref().map_or(&[][..], FailureKind::suggestions) {
        let _ = write!(out, "\n{INDENT}- {hint}");
    }
    out
}

fn table<'a>(heading: &str, rows: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let rows: Vec<(&str, &str)> = rows.collect();
    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

    let mut out = format!("{INDENT}{heading}");
    for (key, value) in rows {
        let _ = write!(out, "\n{INDENT}  {key:<width$}  {value}");
    }
    out
}

fn json_block(heading: &str, json: &Value) -> String {
    let pretty = serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string());
    format!("{INDENT}{heading}\n{}", indent(&pretty))
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("{INDENT}  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
