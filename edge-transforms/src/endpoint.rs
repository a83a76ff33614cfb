//! Backend target URL selection.

use tracing::debug;

use crate::context::VariableBag;

pub const ENDPOINT_VAR: &str = "endpoint";
pub const PATH_SUFFIX_VAR: &str = "proxy.pathsuffix";
pub const QUERY_STRING_VAR: &str = "request.querystring";
pub const TARGET_URL_VAR: &str = "target.url";
pub const ENDPOINT_NOT_FOUND_VAR: &str = "endpointNotFound";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointOutcome {
    TargetUrl(String),
    EndpointNotFound,
}

/// `endpoint + path_suffix`, with the query string appended when there is one.
pub fn target_url(
    endpoint: Option<&str>,
    path_suffix: &str,
    query_string: &str,
) -> EndpointOutcome {
    let Some(endpoint) = endpoint.filter(|e| !e.is_empty()) else {
        return EndpointOutcome::EndpointNotFound;
    };

    let mut url = format!("{}{}", endpoint, path_suffix);
    if !query_string.is_empty() {
        if !query_string.starts_with('?') {
            url.push('?');
        }
        url.push_str(query_string);
    }

    EndpointOutcome::TargetUrl(url)
}

pub struct EndpointInput {
    pub endpoint: Option<String>,
    pub path_suffix: String,
    pub query_string: String,
}

impl EndpointInput {
    pub fn read(bag: &VariableBag) -> Self {
        Self {
            endpoint: bag.get_str(ENDPOINT_VAR).map(str::to_string),
            path_suffix: bag.get_str(PATH_SUFFIX_VAR).unwrap_or_default().to_string(),
            query_string: bag.get_str(QUERY_STRING_VAR).unwrap_or_default().to_string(),
        }
    }

    pub fn target_url(&self) -> EndpointOutcome {
        target_url(
            self.endpoint.as_deref(),
            &self.path_suffix,
            &self.query_string,
        )
    }
}

impl EndpointOutcome {
    pub fn write(self, bag: &mut VariableBag) {
        match self {
            EndpointOutcome::TargetUrl(url) => {
                debug!("Target URL {}", url);
                bag.set(TARGET_URL_VAR, url);
            }
            EndpointOutcome::EndpointNotFound => {
                debug!("No endpoint configured");
                bag.set(ENDPOINT_NOT_FOUND_VAR, true);
            }
        }
    }
}
