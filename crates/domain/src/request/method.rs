//! HTTP Method enumeration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

/// Method of a captured request.
///
/// Besides the usual HTTP verbs the capture server reports inbound
/// WebSocket messages as `RECEIVE`. Any other token is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Method {
    /// HTTP GET method
    #[default]
    Get,
    /// HTTP POST method
    Post,
    /// HTTP PUT method
    Put,
    /// HTTP PATCH method
    Patch,
    /// HTTP DELETE method
    Delete,
    /// HTTP HEAD method
    Head,
    /// HTTP OPTIONS method
    Options,
    /// A message received over a WebSocket connection.
    Receive,
    /// Any other method token, stored upper-cased.
    Extension(String),
}

impl Method {
    /// Returns the standard methods in the order they are offered as filters.
    #[must_use]
    pub fn standard() -> [Self; 8] {
        [
            Self::Get,
            Self::Post,
            Self::Put,
            Self::Patch,
            Self::Delete,
            Self::Head,
            Self::Options,
            Self::Receive,
        ]
    }

    /// Returns whether an outbound request with this method carries a body.
    ///
    /// GET and HEAD never do, whatever the draft contains.
    #[must_use]
    pub const fn sends_body(&self) -> bool {
        !matches!(self, Self::Get | Self::Head)
    }

    /// Returns whether this method can be used for an outbound HTTP request.
    #[must_use]
    pub const fn is_sendable(&self) -> bool {
        !matches!(self, Self::Receive)
    }

    /// Returns the method token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Receive => "RECEIVE",
            Self::Extension(token) => token,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let token = s.trim().to_uppercase();
        match token.as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "RECEIVE" => Ok(Self::Receive),
            "" => Err(DomainError::UnsupportedMethod(s.to_string())),
            _ if token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') => {
                Ok(Self::Extension(token))
            }
            _ => Err(DomainError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for Method {
    type Error = DomainError;

    /// Reads a method reported by the server. Unlike [`FromStr`], any
    /// non-empty token is accepted so one odd capture cannot fail a whole
    /// snapshot.
    fn try_from(value: String) -> DomainResult<Self> {
        match value.parse() {
            Ok(method) => Ok(method),
            Err(_) if !value.trim().is_empty() => Ok(Self::Extension(value.trim().to_uppercase())),
            Err(error) => Err(error),
        }
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        match method {
            Method::Extension(token) => token,
            other => other.as_str().to_string(),
        }
    }
}
