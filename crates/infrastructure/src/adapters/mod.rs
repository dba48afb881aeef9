//! Infrastructure adapters

mod inspector_client;
mod reqwest_sender;
mod system_clock;
mod tungstenite_socket;

pub use inspector_client::GraphQlInspectorClient;
pub use reqwest_sender::ReqwestSender;
pub use system_clock::SystemClock;
pub use tungstenite_socket::{TungsteniteConnector, TungsteniteLink};
