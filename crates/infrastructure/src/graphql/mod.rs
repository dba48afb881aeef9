//! GraphQL client for the capture server.
//!
//! Queries and mutations go over HTTP; subscriptions use the `graphql-ws`
//! WebSocket sub-protocol.

pub mod documents;
mod error;
mod http;
pub mod protocol;
mod subscription;
pub mod wire;

pub use documents::Document;
pub use error::GraphQlError;
pub use http::GraphQlHttp;
pub use subscription::GraphQlSubscription;
