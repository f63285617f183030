//! Error values returned across the connector boundary.
//!
//! Every failure carries a short human-readable `description` and optional
//! `details` (raw protocol error text) so the caller can show one and keep
//! the other for diagnostics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for connector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure categories reported by connectors and transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ConnectTimeout,
    AuthenticationFailure,
    /// Malformed or unexpected response from the device.
    ProtocolError,
    /// The connector or device does not support the requested change.
    UnsupportedOperation,
    /// Interface or VLAN key is not known to the device model.
    NotFound,
    /// The SNMP identity probe failed; the session cannot continue.
    ProbeError,
    ConfigSaveError,
    /// A phase was requested before the phase it depends on.
    InvalidState,
    /// The caller cancelled the session.
    Cancelled,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::ConnectTimeout => "connect timeout",
            ErrorKind::AuthenticationFailure => "authentication failure",
            ErrorKind::ProtocolError => "protocol error",
            ErrorKind::UnsupportedOperation => "unsupported operation",
            ErrorKind::NotFound => "not found",
            ErrorKind::ProbeError => "probe error",
            ErrorKind::ConfigSaveError => "config save error",
            ErrorKind::InvalidState => "invalid state",
            ErrorKind::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Structured connector error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {description}")]
pub struct Error {
    pub kind: ErrorKind,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            details: None,
        }
    }

    /// Attach raw diagnostic text (library error, device response).
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn timeout(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConnectTimeout, description)
    }

    pub fn auth(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthenticationFailure, description)
    }

    pub fn protocol(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProtocolError, description)
    }

    pub fn unsupported(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedOperation, description)
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        Self::new(ErrorKind::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn probe(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProbeError, description)
    }

    pub fn save(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigSaveError, description)
    }

    pub fn invalid_state(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidState, description)
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "Operation cancelled")
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_description() {
        let err = Error::not_found("Interface", "42");
        assert_eq!(err.to_string(), "not found: Interface not found: 42");
        assert!(err.is(ErrorKind::NotFound));
        assert!(err.details.is_none());
    }

    #[test]
    fn test_details_are_kept() {
        let err = Error::protocol("SNMP GET failed").with_details("Response(NoSuchName)");
        assert_eq!(err.details.as_deref(), Some("Response(NoSuchName)"));
    }

    #[test]
    fn test_serializes_kind_snake_case() {
        let err = Error::unsupported("Device is Read-Only");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "unsupported_operation");
        assert!(json.get("details").is_none());
    }
}
