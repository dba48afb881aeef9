//! Method filter applied to the request feed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::request::Method;

/// The method filter selected by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MethodFilter {
    /// Show every request.
    #[default]
    All,
    /// Show only requests with this method.
    Only(Method),
}

impl MethodFilter {
    /// Returns whether a request with `method` passes the filter.
    #[must_use]
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == method,
        }
    }

    /// The selectable options: `ALL` followed by the standard methods.
    #[must_use]
    pub fn options() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(Method::standard().into_iter().map(Self::Only))
            .collect()
    }

    /// Text shown on the filter option itself.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => "ALL",
            Self::Only(method) => method.as_str(),
        }
    }
}

impl fmt::Display for MethodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MethodFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl TryFrom<String> for MethodFilter {
    type Error = DomainError;

    fn try_from(value: String) -> DomainResult<Self> {
        value.parse()
    }
}

impl From<MethodFilter> for String {
    fn from(filter: MethodFilter) -> Self {
        filter.label().to_string()
    }
}

impl From<Method> for MethodFilter {
    fn from(method: Method) -> Self {
        Self::Only(method)
    }
}
