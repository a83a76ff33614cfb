//! Adapter between the gateway runtime's variable bag and the transforms.

use serde::Deserialize;
use tracing::info;

use crate::context::VariableBag;
use crate::diagnostics::{build_payload, ClassificationSignal, UpstreamResponse};
use crate::endpoint::EndpointInput;
use crate::headers::{self, filter_headers, HeaderFilter};
use crate::version::{self, extract_version, VersionMode};

/// A transform and its deployment parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Script {
    ExtractVersion {
        #[serde(default)]
        mode: VersionMode,
    },
    SetAllowedHeaders(HeaderFilter),
    TargetEndpoint,
    DynamicPayload {
        #[serde(default)]
        signal: ClassificationSignal,
    },
}

impl Script {
    /// Read this script's inputs from the bag, run it, and write its outputs back.
    pub fn run(&self, bag: &mut VariableBag) {
        info!("Running edge script {:?}", self);

        match self {
            Script::ExtractVersion { mode } => {
                let accept = version::read(bag);
                extract_version(accept.as_deref(), *mode).write(bag);
            }
            Script::SetAllowedHeaders(filter) => {
                let (names, set_cookie) = headers::read(bag, filter);
                filter_headers(&names, set_cookie, filter).write(bag);
            }
            Script::TargetEndpoint => {
                EndpointInput::read(bag).target_url().write(bag);
            }
            Script::DynamicPayload { signal } => {
                let upstream = UpstreamResponse::read(bag);
                build_payload(&upstream.content, upstream.status, *signal).write(bag);
            }
        }
    }
}
