//! Request Hole Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer: a GraphQL client for the capture
//! server and the transports behind the manual send panels.

pub mod adapters;
pub mod config;
pub mod graphql;

pub use adapters::{
    GraphQlInspectorClient, ReqwestSender, SystemClock, TungsteniteConnector, TungsteniteLink,
};
pub use config::{DEFAULT_ENDPOINT, EndpointError, InspectorEndpoint};
pub use graphql::{GraphQlError, GraphQlHttp, GraphQlSubscription};
