//! Method/path routing for the event Lambdas.

use lambda_http::{Request, RequestExt};

/// The operations an event Lambda can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `GET /_status`
    Status,
    /// `POST /event`
    CreateEvent,
    /// `GET /event?id=`
    GetEvent,
    /// `DELETE /event?id=`
    DeleteEvent,
}

impl Operation {
    /// Every operation, as served by the combined handler.
    pub const ALL: &'static [Operation] = &[
        Operation::Status,
        Operation::CreateEvent,
        Operation::GetEvent,
        Operation::DeleteEvent,
    ];

    fn matches(self, method: &str, path: &str) -> bool {
        match self {
            Operation::Status => method == "GET" && path == "/_status",
            Operation::CreateEvent => method == "POST" && path == "/event",
            Operation::GetEvent => method == "GET" && path == "/event",
            Operation::DeleteEvent => method == "DELETE" && path == "/event",
        }
    }
}

/// Resolve a method/path pair against the operations a deployment serves.
pub fn route(method: &str, path: &str, enabled: &[Operation]) -> Option<Operation> {
    enabled.iter().copied().find(|op| op.matches(method, path))
}

/// Resource path of the request, without any API Gateway stage prefix.
pub fn request_path(event: &Request) -> &str {
    match event.raw_http_path() {
        "" => event.uri().path(),
        raw => raw,
    }
}

/// Non-empty `id` query string parameter.
pub fn event_id(event: &Request) -> Option<&str> {
    event
        .query_string_parameters_ref()
        .and_then(|params| params.first("id"))
        .filter(|id| !id.is_empty())
}
