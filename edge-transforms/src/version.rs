//! API version negotiation from the `Accept` header.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::debug;

use crate::context::VariableBag;

pub const ACCEPT_HEADER_VAR: &str = "request.header.Accept";
pub const VERSION_VAR: &str = "version";
pub const INVALID_ACCEPT_HEADER_VAR: &str = "invalidAcceptHeader";

/// Version used when the client does not ask for one.
pub const DEFAULT_VERSION: &str = "1";

/// How strictly the `Accept` header is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionMode {
    /// Only `application/fhir+json`, optionally with `; version=N`, or `*/*`.
    #[default]
    Strict,
    /// Take a version if one is present, otherwise default.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionOutcome {
    Version(String),
    InvalidAcceptHeader,
}

fn valid_accept() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(application/fhir\+json(;|;\s*version=[0-9]+)?|\*/\*)$")
            .expect("valid Accept pattern")
    })
}

fn version_param() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)application/fhir\+json;\s*version=([0-9]+)")
            .expect("valid version pattern")
    })
}

fn version_or_default(accept: &str) -> String {
    version_param()
        .captures(accept)
        .and_then(|caps| caps.get(1))
        .map_or(DEFAULT_VERSION, |m| m.as_str())
        .to_string()
}

/// Work out the requested version from an `Accept` header value.
pub fn extract_version(accept: Option<&str>, mode: VersionMode) -> VersionOutcome {
    let Some(accept) = accept.filter(|a| !a.is_empty()) else {
        return VersionOutcome::Version(DEFAULT_VERSION.to_string());
    };

    match mode {
        VersionMode::Strict if !valid_accept().is_match(accept) => {
            VersionOutcome::InvalidAcceptHeader
        }
        _ => VersionOutcome::Version(version_or_default(accept)),
    }
}

/// Reads the `Accept` header from the bag.
pub fn read(bag: &VariableBag) -> Option<String> {
    bag.get_str(ACCEPT_HEADER_VAR).map(str::to_string)
}

impl VersionOutcome {
    pub fn write(self, bag: &mut VariableBag) {
        match self {
            VersionOutcome::Version(version) => {
                debug!("Negotiated version {}", version);
                bag.set(VERSION_VAR, version);
            }
            VersionOutcome::InvalidAcceptHeader => {
                debug!("Rejected Accept header");
                bag.set(INVALID_ACCEPT_HEADER_VAR, true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(v: &str) -> VersionOutcome {
        VersionOutcome::Version(v.to_string())
    }

    #[test]
    fn test_explicit_version() {
        assert_eq!(
            extract_version(Some("application/fhir+json; version=2"), VersionMode::Strict),
            version("2")
        );
        assert_eq!(
            extract_version(Some("Application/FHIR+JSON;version=13"), VersionMode::Strict),
            version("13")
        );
    }

    #[test]
    fn test_missing_header_defaults() {
        assert_eq!(extract_version(None, VersionMode::Strict), version("1"));
        assert_eq!(extract_version(Some(""), VersionMode::Strict), version("1"));
        assert_eq!(extract_version(None, VersionMode::Lenient), version("1"));
    }

    #[test]
    fn test_valid_header_without_version_defaults() {
        for accept in ["application/fhir+json", "application/fhir+json;", "*/*"] {
            assert_eq!(
                extract_version(Some(accept), VersionMode::Strict),
                version("1"),
                "{}",
                accept
            );
        }
    }

    #[test]
    fn test_strict_rejects_other_media_types() {
        for accept in [
            "text/plain",
            "application/json",
            "application/fhir+json; version=abc",
            "application/fhir+json; version=2, text/html",
        ] {
            assert_eq!(
                extract_version(Some(accept), VersionMode::Strict),
                VersionOutcome::InvalidAcceptHeader,
                "{}",
                accept
            );
        }
    }

    #[test]
    fn test_only_ascii_digits_are_versions() {
        // ARABIC-INDIC DIGIT TWO
        let accept = "application/fhir+json; version=\u{662}";
        assert_eq!(
            extract_version(Some(accept), VersionMode::Strict),
            VersionOutcome::InvalidAcceptHeader
        );
        assert_eq!(extract_version(Some(accept), VersionMode::Lenient), version("1"));
    }

    #[test]
    fn test_lenient_never_rejects() {
        assert_eq!(
            extract_version(Some("text/plain"), VersionMode::Lenient),
            version("1")
        );
        assert_eq!(
            extract_version(
                Some("application/fhir+json; version=3, text/html"),
                VersionMode::Lenient
            ),
            version("3")
        );
    }

    #[test]
    fn test_write_publishes_flag_instead_of_version() {
        let mut bag = VariableBag::default();
        VersionOutcome::InvalidAcceptHeader.write(&mut bag);
        assert!(bag.is_set(INVALID_ACCEPT_HEADER_VAR));
        assert!(!bag.is_set(VERSION_VAR));

        let mut bag = VariableBag::default();
        version("2").write(&mut bag);
        assert_eq!(bag.get_str(VERSION_VAR), Some("2"));
        assert!(!bag.is_set(INVALID_ACCEPT_HEADER_VAR));
    }
}
