//! Quant Cloud API types.
//!
//! This module defines the request and response bodies exchanged with the
//! environments endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compose::sanitize;
use crate::error::ApiError;

/// An environment as reported by the control plane.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Environment name.
    #[serde(default)]
    pub env_name: String,
    /// Current compose definition.
    #[serde(default)]
    pub compose_definition: Option<Value>,
    /// Minimum instance count.
    #[serde(default)]
    pub min_capacity: Option<i64>,
    /// Maximum instance count.
    #[serde(default)]
    pub max_capacity: Option<i64>,
    /// Deployment status, when reported.
    #[serde(default)]
    pub status: Option<String>,
}

/// Request to create a new environment.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnvironmentRequest {
    /// Environment name.
    pub env_name: String,
    /// Minimum instance count.
    pub min_capacity: i64,
    /// Maximum instance count.
    pub max_capacity: i64,
    /// Compose definition.
    pub compose_definition: Option<Value>,
    /// Environment to clone configuration from.
    pub clone_configuration_from: Option<String>,
    /// Suffix appended to image tags.
    pub image_suffix: Option<String>,
}

/// Request to update an existing environment.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnvironmentRequest {
    /// Compose definition.
    pub compose_definition: Value,
    /// Minimum instance count.
    pub min_capacity: i64,
    /// Maximum instance count.
    pub max_capacity: i64,
    /// Suffix appended to image tags.
    pub image_suffix: Option<String>,
}

/// Serializes `request` and prunes its nulls.
fn to_payload<T: Serialize>(request: &T) -> Result<Value, ApiError> {
    let value = serde_json::to_value(request).map_err(|e| ApiError::InvalidRequest {
        message: format!("Failed to serialize request: {e}"),
    })?;
    Ok(sanitize(&value).unwrap_or_else(|| Value::Object(serde_json::Map::new())))
}

impl CreateEnvironmentRequest {
    /// Returns the sanitized JSON body for this request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be serialized.
    pub fn payload(&self) -> Result<Value, ApiError> {
        to_payload(self)
    }
}

impl UpdateEnvironmentRequest {
    /// Returns the sanitized JSON body for this request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be serialized.
    pub fn payload(&self) -> Result<Value, ApiError> {
        to_payload(self)
    }
}
