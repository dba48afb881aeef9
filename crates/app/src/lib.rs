//! Request Hole console - wiring
//!
//! Builds the adapters for an endpoint and runs one command through the
//! console.

pub mod cli;
pub mod logging;

use std::io::{self, Write};
use std::sync::Arc;

use rhole_application::ApplicationError;
use rhole_application::ports::Clock;
use rhole_infrastructure::{
    EndpointError, GraphQlError, GraphQlInspectorClient, InspectorEndpoint, ReqwestSender,
    SystemClock, TungsteniteConnector,
};
use rhole_ui::{Console, FeedView, UiCommand};
use thiserror::Error;
use tokio::io::AsyncBufRead;
use tracing::info;

pub use cli::{Cli, Command};

/// Errors that end the process with a failure status.
#[derive(Debug, Error)]
pub enum AppError {
    /// The endpoint could not be parsed.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    /// The GraphQL client could not be built.
    #[error(transparent)]
    Client(#[from] GraphQlError),

    /// An adapter could not be built.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Reading input or writing output failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Some commands reported errors; they were already printed.
    #[error("{0} error(s) reported")]
    Reported(usize),
}

/// Runs `cli`'s command, reading console input from `input` and writing
/// rendered output to `out`.
///
/// # Errors
///
/// Returns an error if the adapters cannot be built, the output cannot be
/// written, or any step of the command failed.
pub async fn run<R, W>(cli: &Cli, input: R, out: W) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    let endpoint: InspectorEndpoint = cli.endpoint.parse()?;
    info!(http = %endpoint.http_url(), ws = %endpoint.ws_url(), "using endpoint");

    let api = Arc::new(GraphQlInspectorClient::new(&endpoint)?);
    let http = Arc::new(ReqwestSender::new()?);
    let connector = Arc::new(TungsteniteConnector::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let mut console = Console::new(api, http, connector, clock, out);
    let mut header_failed = false;

    match cli.command() {
        Command::Watch => {
            console.boot().await?;
            console.run(input).await?;
        }
        Command::List {
            method,
            hide_details,
        } => {
            console = console.with_view(
                FeedView::new()
                    .with_filter(method)
                    .with_details(!hide_details),
            );
            console.snapshot().await?;
        }
        Command::Clear => {
            console.snapshot().await?;
            console.handle(UiCommand::ClearRequests).await?;
        }
        Command::Info => {
            header_failed = !console.load_header().await?;
        }
        Command::Send { method, url, body } => {
            console.load_header().await?;
            let edits = [
                method.map(UiCommand::SetMethod),
                url.map(UiCommand::SetUrl),
                body.map(UiCommand::SetBody),
            ];
            for command in edits.into_iter().flatten() {
                console.handle(command).await?;
            }
            console.handle(UiCommand::Send).await?;
        }
        Command::Ws { url, messages } => {
            console.load_header().await?;
            if let Some(url) = url {
                console.handle(UiCommand::SetUrl(url)).await?;
            }
            let before = console.failures();
            console.handle(UiCommand::Connect).await?;
            if console.failures() == before {
                if messages.is_empty() {
                    console.handle(UiCommand::Send).await?;
                }
                for message in messages {
                    console.handle(UiCommand::SetBody(message)).await?;
                    console.handle(UiCommand::Send).await?;
                }
                console.handle(UiCommand::Disconnect).await?;
            }
        }
    }

    console.shutdown().await;
    match console.failures() + usize::from(header_failed) {
        0 => Ok(()),
        n => Err(AppError::Reported(n)),
    }
}
