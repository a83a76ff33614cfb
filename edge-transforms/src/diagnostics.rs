//! Normalises upstream error bodies into an OperationOutcome diagnostic payload.
//!
//! The upstream body is expected to look like `{"id": ..., "issue": [{"code": ...}]}`.
//! Only the first issue is considered. Which signal picks the diagnostic message is
//! chosen per deployment with [`ClassificationSignal`]; both signals map onto the same
//! two failure kinds.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::context::VariableBag;

pub const RESPONSE_CONTENT_VAR: &str = "response.content";
pub const RESPONSE_STATUS_VAR: &str = "response.status.code";
pub const PAYLOAD_VAR: &str = "Javascript_dynamic_response";
pub const DEBUG_MESSAGE_VAR: &str = "debugMessage";

pub const OPERATION_OUTCOME_PROFILE: &str =
    "https://simplifier.net/guide/UKCoreDevelopment2/ProfileUKCore-OperationOutcome";
pub const HTTP_ERROR_CODE_SYSTEM: &str = "https://fhir.nhs.uk/Codesystem/http-error-codes";

pub const INVALID_RESOURCE_MESSAGE: &str = "Submitted resource is not valid.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Unexpected internal server error.";

/// What the diagnostic message is keyed off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSignal {
    /// `issue[0].code` of the upstream body.
    #[default]
    IssueCode,
    /// HTTP status of the upstream response.
    HttpStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    InvalidResource,
    InternalServerError,
}

impl Failure {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "invalid_resource" => Some(Failure::InvalidResource),
            "internal_server_error" => Some(Failure::InternalServerError),
            _ => None,
        }
    }

    fn from_status(status: u16) -> Option<Self> {
        match status {
            422 => Some(Failure::InvalidResource),
            500 => Some(Failure::InternalServerError),
            _ => None,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Failure::InvalidResource => INVALID_RESOURCE_MESSAGE,
            Failure::InternalServerError => INTERNAL_ERROR_MESSAGE,
        }
    }
}

/// Diagnostic message for an upstream failure, or `""` when it is not recognised.
pub fn diagnostics_message(
    code: &str,
    status: Option<u16>,
    signal: ClassificationSignal,
) -> &'static str {
    let failure = match signal {
        ClassificationSignal::IssueCode => Failure::from_code(code),
        ClassificationSignal::HttpStatus => status.and_then(Failure::from_status),
    };
    failure.map_or("", Failure::message)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    pub resource_type: String,
    pub id: String,
    pub meta: Meta,
    pub issue: Vec<Issue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meta {
    pub profile: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub severity: String,
    pub code: String,
    pub details: Details,
    pub diagnostics: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Details {
    pub coding: Vec<Coding>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coding {
    pub system: String,
    pub code: String,
}

impl OperationOutcome {
    pub fn error(id: String, code: &str, diagnostics: &str) -> Self {
        Self {
            resource_type: "OperationOutcome".to_string(),
            id,
            meta: Meta {
                profile: vec![OPERATION_OUTCOME_PROFILE.to_string()],
            },
            issue: vec![Issue {
                severity: "error".to_string(),
                code: code.to_string(),
                details: Details {
                    coding: vec![Coding {
                        system: HTTP_ERROR_CODE_SYSTEM.to_string(),
                        code: code.to_string(),
                    }],
                },
                diagnostics: diagnostics.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticOutcome {
    pub payload: OperationOutcome,
    pub debug_message: String,
}

/// Build the diagnostic payload for an upstream response.
///
/// A body that is not JSON, or lacks `id`/`issue`, still produces a payload: the code
/// is left empty and the id is freshly generated.
pub fn build_payload(
    body: &str,
    status: Option<u16>,
    signal: ClassificationSignal,
) -> DiagnosticOutcome {
    let (upstream, debug_message) = match serde_json::from_str::<Value>(body) {
        Ok(parsed) => {
            let message = format!("Executing DynamicPayload. Parsed Response: {}", parsed);
            (parsed, message)
        }
        Err(e) => (
            Value::Null,
            format!("Executing DynamicPayload. Response is not JSON: {}", e),
        ),
    };

    let id = upstream
        .get("id")
        .and_then(Value::as_str)
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
    let code = upstream
        .pointer("/issue/0/code")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let diagnostics = diagnostics_message(code, status, signal);

    DiagnosticOutcome {
        payload: OperationOutcome::error(id, code, diagnostics),
        debug_message,
    }
}

pub struct UpstreamResponse {
    pub content: String,
    pub status: Option<u16>,
}

impl UpstreamResponse {
    pub fn read(bag: &VariableBag) -> Self {
        Self {
            content: bag
                .get_str(RESPONSE_CONTENT_VAR)
                .unwrap_or_default()
                .to_string(),
            status: bag.get_u16(RESPONSE_STATUS_VAR),
        }
    }
}

impl DiagnosticOutcome {
    pub fn write(self, bag: &mut VariableBag) {
        debug!("{}", self.debug_message);
        bag.set(DEBUG_MESSAGE_VAR, self.debug_message);
        match serde_json::to_string(&self.payload) {
            Ok(payload) => bag.set(PAYLOAD_VAR, payload),
            Err(e) => debug!("Failed to serialize diagnostic payload: {}", e),
        }
    }
}
