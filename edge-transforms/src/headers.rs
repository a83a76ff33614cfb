//! Header allow-listing for requests and responses passing through the proxy.

use serde::Deserialize;
use tracing::debug;

use crate::context::VariableBag;

/// Headers allowed through the proxy. Everything else is stripped.
pub const ALLOWED_HEADERS: [&str; 8] = [
    "Date",
    "Content-Type",
    "Content-Length",
    "Connection",
    "X-Correlation-ID",
    "X-Request-ID",
    "Accept",
    "Strict-Transport-Security",
];

pub const HEADERS_TO_REMOVE_VAR: &str = "headersToRemove";
pub const DEBUG_HEADERS_TO_REMOVE_VAR: &str = "debug.headersToRemove";

/// Which message's headers a filter applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Request,
    #[default]
    Response,
}

impl Stage {
    fn prefix(self) -> &'static str {
        match self {
            Stage::Request => "request",
            Stage::Response => "response",
        }
    }

    pub fn header_names_var(self) -> String {
        format!("{}.headers.names", self.prefix())
    }

    pub fn set_cookie_var(self) -> String {
        format!("{}.header.Set-Cookie", self.prefix())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HeaderFilter {
    #[serde(default)]
    pub stage: Stage,
    /// Drop `Set-Cookie` from the message directly.
    #[serde(default)]
    pub strip_set_cookie: bool,
    /// Also publish the removal list under `debug.headersToRemove`.
    #[serde(default)]
    pub record_debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFilterOutcome {
    pub stage: Stage,
    pub headers_to_remove: Vec<String>,
    pub remove_set_cookie: bool,
    pub record_debug: bool,
}

pub fn is_allowed(name: &str) -> bool {
    ALLOWED_HEADERS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(name))
}

/// Names not on the allow-list, in their original order.
pub fn headers_to_remove(names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|name| !is_allowed(name))
        .cloned()
        .collect()
}

pub fn filter_headers(
    names: &[String],
    set_cookie_present: bool,
    filter: &HeaderFilter,
) -> HeaderFilterOutcome {
    HeaderFilterOutcome {
        stage: filter.stage,
        headers_to_remove: headers_to_remove(names),
        remove_set_cookie: filter.strip_set_cookie && set_cookie_present,
        record_debug: filter.record_debug,
    }
}

/// Reads the header names for the filter's stage and whether `Set-Cookie` is present.
pub fn read(bag: &VariableBag, filter: &HeaderFilter) -> (Vec<String>, bool) {
    (
        bag.get_string_list(&filter.stage.header_names_var()),
        bag.is_set(&filter.stage.set_cookie_var()),
    )
}

impl HeaderFilterOutcome {
    pub fn write(self, bag: &mut VariableBag) {
        let joined = self.headers_to_remove.join(",");
        debug!("Headers to remove: {}", joined);

        if self.remove_set_cookie {
            bag.remove(&self.stage.set_cookie_var());
        }
        if self.record_debug {
            bag.set(DEBUG_HEADERS_TO_REMOVE_VAR, joined.clone());
        }
        bag.set(HEADERS_TO_REMOVE_VAR, joined);
    }
}
