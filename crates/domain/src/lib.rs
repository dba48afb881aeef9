//! Request Hole Domain - Core types
//!
//! This crate defines the domain model for the Request Hole console:
//! captured requests, the request feed, and the manual send panels.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod feed;
pub mod filter;
pub mod format;
pub mod id;
pub mod request;
pub mod send;
pub mod server_info;
pub mod state;
pub mod websocket;

pub use error::{DomainError, DomainResult};
pub use feed::{FeedPhase, FeedState, count_label, filter_requests, sort_requests};
pub use filter::MethodFilter;
pub use format::{format_time_ago, pluralize, pluralize_with};
pub use id::RequestId;
pub use request::{CapturedRequest, Headers, Method, ParamFields, ParamMap, RequestFields};
pub use send::{HttpSendDraft, OutboundRequest, default_body};
pub use server_info::{ServerInfo, Transport};
pub use state::{FailureKind, LoadState};
pub use websocket::{ConnectionState, WebSocketError, WebSocketMessage, WebSocketPanel};
