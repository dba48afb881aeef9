//! A single captured request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{Headers, Method, ParamFields};
use crate::id::RequestId;

/// Request line information recorded by the capture server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFields {
    /// Request method, or `RECEIVE` for WebSocket messages.
    pub method: Method,
    /// Request URL (usually path and query).
    pub url: String,
    /// Server-side timing, kept as display text.
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: Option<String>,
}

impl RequestFields {
    /// Creates fields with no timing information.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            time: None,
        }
    }
}

/// A captured inbound HTTP request or WebSocket message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedRequest {
    /// Server-assigned identity, unique within the feed.
    pub id: RequestId,
    /// Method, URL and timing.
    pub fields: RequestFields,
    /// Request headers. A null map reads as empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: Headers,
    /// Parsed parameters, if any.
    #[serde(default)]
    pub param_fields: ParamFields,
    /// Capture time; immutable and used as the sort key.
    pub created_at: DateTime<Utc>,
}

impl CapturedRequest {
    /// Creates a capture without headers or parameters.
    #[must_use]
    pub fn new(
        id: impl Into<RequestId>,
        fields: RequestFields,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            fields,
            headers: Headers::new(),
            param_fields: ParamFields::None,
            created_at,
        }
    }

    /// Sets the headers.
    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the parsed parameters.
    #[must_use]
    pub fn with_params(mut self, params: ParamFields) -> Self {
        self.param_fields = params;
        self
    }

    /// Shortcut for `fields.method`.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.fields.method
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_deserialize_snapshot_entry() {
        let request: CapturedRequest = serde_json::from_value(json!({
            "id": "e0977611-3c2f-4494-9977-1db2352065ef",
            "fields": { "method": "GET", "url": "/" },
            "headers": {
                "Accept": ["*/*"],
                "Content-Type": ["application/json"]
            },
            "param_fields": { "form": null, "query": null, "json": null, "json_array": null },
            "created_at": "2021-07-09T13:41:27-10:00"
        }))
        .unwrap();

        assert_eq!(request.id.as_str(), "e0977611-3c2f-4494-9977-1db2352065ef");
        assert_eq!(request.method(), &Method::Get);
        assert_eq!(request.headers.len(), 2);
        assert!(request.param_fields.is_none());
        assert_eq!(request.created_at.to_rfc3339(), "2021-07-09T23:41:27+00:00");
    }

    #[test]
    fn test_time_accepts_number_or_string() {
        let fields: RequestFields =
            serde_json::from_value(json!({ "method": "POST", "url": "/a", "time": 1250 })).unwrap();
        assert_eq!(fields.time.as_deref(), Some("1250"));

        let fields: RequestFields =
            serde_json::from_value(json!({ "method": "POST", "url": "/a", "time": "1.2ms" }))
                .unwrap();
        assert_eq!(fields.time.as_deref(), Some("1.2ms"));

        let fields: RequestFields =
            serde_json::from_value(json!({ "method": "POST", "url": "/a" })).unwrap();
        assert_eq!(fields.time, None);
    }

    #[test]
    fn test_missing_params_and_headers_default() {
        let request: CapturedRequest = serde_json::from_value(json!({
            "id": "1",
            "fields": { "method": "RECEIVE", "url": "/ws" },
            "headers": null,
            "param_fields": null,
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert!(request.headers.is_empty());
        assert!(request.param_fields.is_none());
        assert_eq!(request.method(), &Method::Receive);
    }
}
