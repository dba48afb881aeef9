//! Command-line interface.

use clap::{Parser, Subcommand};
use rhole_domain::{Method, MethodFilter};
use rhole_infrastructure::DEFAULT_ENDPOINT;

/// Request Hole inspector console.
#[derive(Debug, Parser)]
#[command(name = "rhole")]
#[command(author, version, about = "Watch and replay requests captured by Request Hole", long_about = None)]
pub struct Cli {
    /// GraphQL endpoint of the Request Hole web UI
    #[arg(long, env = "RHOLE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Log filter for stderr, e.g. `info` or `rhole_infrastructure=debug`.
    /// `RUST_LOG` takes precedence.
    #[arg(long, env = "RHOLE_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The subcommand, defaulting to `watch`.
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Watch)
    }
}

/// What to do once connected.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Interactive live console (default)
    Watch,

    /// Print the captured requests once
    List {
        /// Only show requests with this method (or ALL)
        #[arg(long, default_value = "ALL")]
        method: MethodFilter,

        /// Print only method, time and URL
        #[arg(long)]
        hide_details: bool,
    },

    /// Clear every captured request on the server
    Clear,

    /// Show where the server listens
    Info,

    /// Send an HTTP request to the capture endpoint
    Send {
        /// Request method (default GET)
        #[arg(long)]
        method: Option<Method>,

        /// Target URL (default: the capture endpoint)
        #[arg(long)]
        url: Option<String>,

        /// Request body, ignored for GET and HEAD
        #[arg(long)]
        body: Option<String>,
    },

    /// Send WebSocket messages to the capture endpoint
    Ws {
        /// Target URL (default: the capture endpoint)
        #[arg(long)]
        url: Option<String>,

        /// Messages to send, one frame each. Sends the default body when
        /// none are given.
        messages: Vec<String>,
    },
}
