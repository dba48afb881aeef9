//! Request Hole Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for the capture server and outbound transports)
//! - Use case orchestration (request feed, send panels, server info)
//! - Application-level error handling

pub mod error;
pub mod ports;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    Clock, FixedClock, InspectorApi, OutboundHttp, RequestSubscription, SubscriptionSink,
    WebSocketConnector, WebSocketLink,
};
pub use use_cases::{LoadServerInfo, RequestFeed, SendHttpRequest, WebSocketSession};
