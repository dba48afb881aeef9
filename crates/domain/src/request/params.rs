//! Parameters parsed from a captured request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat key-value parameters (query string or form body).
pub type ParamMap = BTreeMap<String, String>;

/// The parameters the server extracted from a capture.
///
/// At most one kind is present. `None` is the "no params" fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<WireParamFields>", into = "WireParamFields")]
pub enum ParamFields {
    /// No parameters were captured.
    #[default]
    None,
    /// Query string parameters.
    Query(ParamMap),
    /// URL-encoded or multipart form fields.
    Form(ParamMap),
    /// A JSON object body.
    Json(Map<String, Value>),
    /// A JSON array body.
    JsonArray(Vec<Value>),
    /// A raw WebSocket message.
    Message(String),
}

impl ParamFields {
    /// Returns true if no parameters were captured.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Short name of the variant, matching the wire key.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Query(_) => "query",
            Self::Form(_) => "form",
            Self::Json(_) => "json",
            Self::JsonArray(_) => "json_array",
            Self::Message(_) => "message",
        }
    }

    /// Parses a message body as JSON, if it is JSON.
    #[must_use]
    pub fn message_json(&self) -> Option<Value> {
        match self {
            Self::Message(body) => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}

/// Wire shape: one object with a nullable key per kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireParamFields {
    #[serde(default)]
    form: Option<ParamMap>,
    #[serde(default)]
    query: Option<ParamMap>,
    #[serde(default)]
    json: Option<Map<String, Value>>,
    #[serde(default)]
    json_array: Option<Vec<Value>>,
    #[serde(default)]
    message: Option<String>,
}

impl From<Option<WireParamFields>> for ParamFields {
    fn from(wire: Option<WireParamFields>) -> Self {
        let Some(wire) = wire else {
            return Self::None;
        };
        // Same precedence the feed renderer has always applied.
        if let Some(json) = wire.json {
            Self::Json(json)
        } else if let Some(array) = wire.json_array {
            Self::JsonArray(array)
        } else if let Some(query) = wire.query {
            Self::Query(query)
        } else if let Some(form) = wire.form {
            Self::Form(form)
        } else {
            match wire.message {
                Some(message) if !message.is_empty() => Self::Message(message),
                _ => Self::None,
            }
        }
    }
}

impl From<ParamFields> for WireParamFields {
    fn from(params: ParamFields) -> Self {
        let mut wire = Self::default();
        match params {
            ParamFields::None => {}
            ParamFields::Query(query) => wire.query = Some(query),
            ParamFields::Form(form) => wire.form = Some(form),
            ParamFields::Json(json) => wire.json = Some(json),
            ParamFields::JsonArray(array) => wire.json_array = Some(array),
            ParamFields::Message(message) => wire.message = Some(message),
        }
        wire
    }
}
