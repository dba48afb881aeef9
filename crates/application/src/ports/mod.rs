//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod inspector_api;
mod outbound_http;
mod websocket;

pub use clock::{Clock, FixedClock};
pub use inspector_api::{InspectorApi, RequestSubscription, SubscriptionSink};
pub use outbound_http::OutboundHttp;
pub use websocket::{WebSocketConnector, WebSocketLink};
