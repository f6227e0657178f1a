//! Validation of a resolved environment spec.
//!
//! Errors stop the run before any network call. Warnings flag inputs that
//! are accepted but have no effect for the requested operation.

use crate::error::{ConfigError, Result};
use tracing::{debug, warn};

use super::spec::{CreateMode, EnvironmentSpec, Operation};

/// Validator for environment specs.
#[derive(Debug, Default)]
pub struct SpecValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The input that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl SpecValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates an environment spec.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self, spec: &EnvironmentSpec) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();

        Self::validate_address(spec, &mut result);
        Self::validate_compose(spec, &mut result);
        Self::validate_operation_inputs(spec, &mut result);
        Self::validate_capacity(spec, &mut result);

        for warning in &result.warnings {
            warn!("{warning}");
        }

        if result.errors.is_empty() {
            debug!("Environment spec validation passed");
            Ok(result)
        } else {
            let first_error = &result.errors[0];
            Err(ConfigError::validation(first_error.message.clone(), first_error.field.clone()).into())
        }
    }

    /// Validates the resource address.
    fn validate_address(spec: &EnvironmentSpec, result: &mut ValidationResult) {
        let address = [
            ("organization", &spec.organization),
            ("app_name", &spec.application),
            ("environment_name", &spec.name),
        ];

        for (field, value) in address {
            if value.trim().is_empty() {
                result.errors.push(ValidationError {
                    field: String::from(field),
                    message: format!("{field} cannot be empty"),
                });
            }
        }
    }

    /// Validates the shape of the compose definition.
    fn validate_compose(spec: &EnvironmentSpec, result: &mut ValidationResult) {
        if let Some(compose) = &spec.compose {
            if !compose.is_object() {
                result.errors.push(ValidationError {
                    field: String::from("compose_spec"),
                    message: String::from("Compose definition must be a JSON object"),
                });
            }
        }
    }

    /// Flags inputs the requested operation ignores.
    fn validate_operation_inputs(spec: &EnvironmentSpec, result: &mut ValidationResult) {
        if spec.operation != Operation::Create && spec.create_mode == CreateMode::Strict {
            result.warnings.push(format!(
                "create_mode is ignored for {}",
                spec.operation
            ));
        }

        match spec.operation {
            Operation::Delete => {
                if spec.compose.is_some() {
                    result
                        .warnings
                        .push(String::from("compose_spec is ignored for delete"));
                }
                if spec.clone_from.is_some() {
                    result
                        .warnings
                        .push(String::from("from_environment is ignored for delete"));
                }
                if spec.image_suffix.is_some() {
                    result
                        .warnings
                        .push(String::from("image_suffix is ignored for delete"));
                }
            }
            Operation::Update => {
                if spec.clone_from.is_some() {
                    result
                        .warnings
                        .push(String::from("from_environment is ignored for update"));
                }
            }
            Operation::Create => {}
        }
    }

    /// Flags unusual capacity bounds. The control plane decides validity.
    fn validate_capacity(spec: &EnvironmentSpec, result: &mut ValidationResult) {
        if spec.min_capacity > spec.max_capacity {
            result.warnings.push(format!(
                "min_capacity ({}) is greater than max_capacity ({})",
                spec.min_capacity, spec.max_capacity
            ));
        }
    }
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_spec() {
        let spec = EnvironmentSpec::new("acme", "shop", "staging").with_compose(json!({}));
        let result = SpecValidator::new().validate(&spec).expect("valid");
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let spec = EnvironmentSpec::new("acme", "shop", "  ");
        assert!(SpecValidator::new().validate(&spec).is_err());
    }

    #[test]
    fn test_non_object_compose_is_rejected() {
        let spec = EnvironmentSpec::new("acme", "shop", "staging").with_compose(json!([1, 2]));
        assert!(SpecValidator::new().validate(&spec).is_err());
    }

    #[test]
    fn test_delete_warns_about_ignored_inputs() {
        let spec = EnvironmentSpec::new("acme", "shop", "staging")
            .with_operation(Operation::Delete)
            .with_clone_from("production");
        let result = SpecValidator::new().validate(&spec).expect("valid");
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_strict_mode_warns_outside_create() {
        let spec = EnvironmentSpec::new("acme", "shop", "staging")
            .with_operation(Operation::Update)
            .with_create_mode(CreateMode::Strict)
            .with_compose(json!({}));
        let result = SpecValidator::new().validate(&spec).expect("valid");
        assert_eq!(result.warnings, vec![String::from("create_mode is ignored for update")]);
    }

    #[test]
    fn test_inverted_capacity_is_only_a_warning() {
        let spec = EnvironmentSpec::new("acme", "shop", "staging").with_capacity(5, 2);
        let result = SpecValidator::new().validate(&spec).expect("valid");
        assert_eq!(result.warnings.len(), 1);
    }
}
