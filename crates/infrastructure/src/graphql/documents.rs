//! GraphQL documents sent to the capture server.

/// A named GraphQL operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document {
    /// Operation name, sent as `operationName`.
    pub operation_name: &'static str,
    /// Full document text.
    pub query: &'static str,
}

macro_rules! request_selection {
    () => {
        "id fields { method url time } headers \
         param_fields { form query json json_array message } created_at"
    };
}

/// Server metadata for the header.
pub const SERVER_INFO: Document = Document {
    operation_name: "GetServerInfo",
    query: "query GetServerInfo { serverInfo { request_address request_port web_port build_info protocol } }",
};

/// Every captured request.
pub const ALL_REQUESTS: Document = Document {
    operation_name: "GetAllRequests",
    query: concat!(
        "query GetAllRequests { requests { ",
        request_selection!(),
        " } }"
    ),
};

/// Newly captured requests, one per event.
pub const REQUEST_SUBSCRIPTION: Document = Document {
    operation_name: "GetRequests",
    query: concat!(
        "subscription GetRequests { request { ",
        request_selection!(),
        " } }"
    ),
};

/// Discards the server's history.
pub const CLEAR_REQUESTS: Document = Document {
    operation_name: "ClearRequests",
    query: "mutation ClearRequests { clearRequests }",
};
