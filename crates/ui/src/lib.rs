//! Request Hole UI - Console presentation layer
//!
//! This crate renders the request feed and the send panels as plain text
//! and drives them from console commands.

pub mod bridge;
pub mod console;
pub mod render;
pub mod state;

pub use bridge::{CommandError, RequestTarget, UiCommand, UiUpdate, parse_command};
pub use console::Console;
pub use state::FeedView;
