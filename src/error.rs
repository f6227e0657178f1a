//! Error types for the environment reconciler.
//!
//! This module provides the error hierarchy for every stage of a run:
//! reading inputs, talking to the Quant Cloud control plane, classifying
//! remote failures, and reconciling the environment.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the reconciler.
#[derive(Debug, Error)]
pub enum QuantError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Raw control-plane client errors.
    #[error("Quant Cloud API error: {0}")]
    Api(#[from] ApiError),

    /// Reconciliation errors.
    #[error("Reconciliation error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Writing the step output failed.
    #[error("Failed to write output '{name}': {message}")]
    Output {
        /// Name of the output being written.
        name: String,
        /// Description of the failure.
        message: String,
    },

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The reconciliation reached its failed terminal state.
    #[error("{0}")]
    ReconciliationFailed(String),
}

/// Errors raised while resolving the invocation inputs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required input was not supplied.
    #[error("Input required and not supplied: {name}")]
    MissingInput {
        /// Name of the missing input.
        name: String,
    },

    /// An input could not be parsed.
    #[error("Invalid value '{value}' for input {name}: {reason}")]
    InvalidValue {
        /// Name of the input.
        name: String,
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The compose document could not be decoded.
    #[error("Failed to parse compose definition: {message}")]
    InvalidCompose {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Two mutually exclusive inputs were both supplied.
    #[error("Inputs {first} and {second} cannot be used together")]
    ConflictingInputs {
        /// First input name.
        first: String,
        /// Second input name.
        second: String,
    },

    /// A referenced file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Validation failed.
    #[error("Input validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Input that failed validation.
        field: Option<String>,
    },
}

/// Raw failures produced by the control-plane client.
///
/// These are never branched on directly; see [`crate::quant::classify`].
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The control plane answered with a non-success status.
    #[error("Quant Cloud API request failed with status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body, if any.
        message: Option<String>,
    },

    /// Network error.
    #[error("Network error communicating with Quant Cloud: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Invalid response from Quant Cloud API: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },

    /// The request could not be built locally.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of the request issue.
        message: String,
    },
}

/// The closed set of outcomes a remote failure is reduced to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifiedError {
    /// The addressed resource does not exist.
    #[error("{}", .message.as_deref().unwrap_or("Not found"))]
    NotFound {
        /// Remote message, when one was supplied.
        message: Option<String>,
    },

    /// The control plane rejected the request with a message.
    #[error("{message}")]
    Remote {
        /// Message supplied by the control plane.
        message: String,
    },

    /// A failure with no usable structure.
    #[error("Unknown error")]
    Unknown,
}

/// Reasons a reconciliation ends in the failed state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// Local validation failed before any mutating call.
    #[error("{message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// An update was requested for an environment that is absent.
    #[error("Cannot update environment '{name}': it does not exist")]
    DoesNotExist {
        /// Name of the environment.
        name: String,
    },

    /// A strict create found the environment already present.
    #[error("Cannot create environment '{name}': it already exists")]
    AlreadyExists {
        /// Name of the environment.
        name: String,
    },

    /// The control plane rejected a call.
    #[error(transparent)]
    Remote(#[from] ClassifiedError),
}

/// Result type alias for reconciler operations.
pub type Result<T> = std::result::Result<T, QuantError>;

impl ConfigError {
    /// Creates a missing-input error.
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingInput { name: name.into() }
    }

    /// Creates an invalid-value error.
    #[must_use]
    pub fn invalid(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates a validation error for a specific input.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl ApiError {
    /// Creates an HTTP status error.
    #[must_use]
    pub fn http(status: u16, message: Option<String>) -> Self {
        Self::Http { status, message }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an invalid-response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

impl ClassifiedError {
    /// Returns true if this is the not-found outcome.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl ReconcileError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_error_has_fixed_message() {
        assert_eq!(ClassifiedError::Unknown.to_string(), "Unknown error");
    }

    #[test]
    fn test_remote_message_is_surfaced_verbatim() {
        let err = ReconcileError::from(ClassifiedError::Remote {
            message: String::from("Quota exceeded"),
        });
        assert_eq!(err.to_string(), "Quota exceeded");
    }

    #[test]
    fn test_http_error_display() {
        let err = ApiError::http(500, Some(String::from("boom")));
        assert_eq!(
            err.to_string(),
            "Quant Cloud API request failed with status 500: boom"
        );
        let err = ApiError::http(502, None);
        assert_eq!(err.to_string(), "Quant Cloud API request failed with status 502");
    }
}
