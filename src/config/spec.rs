//! Desired-state types for a single reconciliation run.
//!
//! These types are built once per invocation from the action inputs and are
//! never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Default Quant Cloud API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://dashboard.quantcdn.io/api/v3";

/// Default minimum and maximum capacity.
pub const DEFAULT_CAPACITY: i64 = 1;

/// The operation requested for the environment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Create the environment, or reconcile it if it already exists.
    #[default]
    Create,
    /// Update an existing environment.
    Update,
    /// Delete the environment.
    Delete,
}

impl FromStr for Operation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(ConfigError::invalid(
                "operation",
                s,
                "expected one of create, update, delete",
            )),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// How a create request treats an environment that already exists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CreateMode {
    /// Existing environments are updated instead.
    #[default]
    Upsert,
    /// Existing environments fail the run.
    Strict,
}

impl FromStr for CreateMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upsert" => Ok(Self::Upsert),
            "strict" => Ok(Self::Strict),
            _ => Err(ConfigError::invalid(
                "create_mode",
                s,
                "expected one of upsert, strict",
            )),
        }
    }
}

/// Desired state of one environment.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnvironmentSpec {
    /// Organization owning the application.
    pub organization: String,
    /// Application the environment belongs to.
    pub application: String,
    /// Environment name.
    pub name: String,
    /// Compose definition, as an opaque document.
    pub compose: Option<serde_json::Value>,
    /// Environment to clone configuration from (create only).
    pub clone_from: Option<String>,
    /// Minimum instance count.
    pub min_capacity: i64,
    /// Maximum instance count.
    pub max_capacity: i64,
    /// Suffix appended to image tags by the control plane.
    pub image_suffix: Option<String>,
    /// Requested operation.
    pub operation: Operation,
    /// Behaviour of create when the environment exists.
    pub create_mode: CreateMode,
}

impl EnvironmentSpec {
    /// Creates a spec with default capacity and operation.
    #[must_use]
    pub fn new(
        organization: impl Into<String>,
        application: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            application: application.into(),
            name: name.into(),
            compose: None,
            clone_from: None,
            min_capacity: DEFAULT_CAPACITY,
            max_capacity: DEFAULT_CAPACITY,
            image_suffix: None,
            operation: Operation::default(),
            create_mode: CreateMode::default(),
        }
    }

    /// Sets the requested operation.
    #[must_use]
    pub const fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    /// Sets the create mode.
    #[must_use]
    pub const fn with_create_mode(mut self, mode: CreateMode) -> Self {
        self.create_mode = mode;
        self
    }

    /// Sets the compose definition.
    #[must_use]
    pub fn with_compose(mut self, compose: serde_json::Value) -> Self {
        self.compose = Some(compose);
        self
    }

    /// Sets the clone source.
    #[must_use]
    pub fn with_clone_from(mut self, source: impl Into<String>) -> Self {
        self.clone_from = Some(source.into());
        self
    }

    /// Sets the image suffix.
    #[must_use]
    pub fn with_image_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.image_suffix = Some(suffix.into());
        self
    }

    /// Sets the capacity bounds.
    #[must_use]
    pub const fn with_capacity(mut self, min: i64, max: i64) -> Self {
        self.min_capacity = min;
        self.max_capacity = max;
        self
    }

    /// Returns true if either a compose definition or a clone source is set.
    #[must_use]
    pub const fn has_definition_source(&self) -> bool {
        self.compose.is_some() || self.clone_from.is_some()
    }
}

/// Connection settings for the control-plane client.
///
/// Built once per invocation and handed to the client; the API key is
/// never stored anywhere else.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API endpoint.
    pub base_url: String,
    /// Bearer credential.
    pub api_key: String,
    /// Optional transport timeout.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates a client configuration.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: None,
        }
    }

    /// Sets the transport timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_parsing() {
        assert_eq!("create".parse::<Operation>().ok(), Some(Operation::Create));
        assert_eq!(" Update ".parse::<Operation>().ok(), Some(Operation::Update));
        assert_eq!("DELETE".parse::<Operation>().ok(), Some(Operation::Delete));
        assert!("destroy".parse::<Operation>().is_err());
    }

    #[test]
    fn test_create_mode_parsing() {
        assert_eq!("strict".parse::<CreateMode>().ok(), Some(CreateMode::Strict));
        assert!("maybe".parse::<CreateMode>().is_err());
    }

    #[test]
    fn test_spec_defaults() {
        let spec = EnvironmentSpec::new("acme", "shop", "staging");
        assert_eq!(spec.min_capacity, 1);
        assert_eq!(spec.max_capacity, 1);
        assert_eq!(spec.operation, Operation::Create);
        assert_eq!(spec.create_mode, CreateMode::Upsert);
        assert!(!spec.has_definition_source());
    }

    #[test]
    fn test_client_config_debug_redacts_key() {
        let config = ClientConfig::new(DEFAULT_BASE_URL, "super-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
