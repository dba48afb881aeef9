//! Application use cases (business logic orchestration).

mod load_server_info;
mod request_feed;
mod send_request;
mod websocket_session;

pub use load_server_info::LoadServerInfo;
pub use request_feed::RequestFeed;
pub use send_request::SendHttpRequest;
pub use websocket_session::WebSocketSession;
