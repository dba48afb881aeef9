//! Captured request types.

mod capture;
mod headers;
mod method;
mod params;

pub use capture::{CapturedRequest, RequestFields};
pub use headers::Headers;
pub use method::Method;
pub use params::{ParamFields, ParamMap};
