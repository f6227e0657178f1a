//! Container validation for compose definitions.
//!
//! Every container submitted in an update must reference an image. This is
//! checked locally so that a bad definition never reaches the control plane.

use serde_json::Value;
use tracing::debug;

use crate::error::ReconcileError;

/// Field every container entry must carry.
pub const IMAGE_REFERENCE_FIELD: &str = "imageReference";

/// Field listing the containers of a compose definition.
const CONTAINERS_FIELD: &str = "containers";

/// A single container validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerIssue {
    /// Container name, or `#<index>` for unnamed entries.
    pub container: String,
    /// The error message.
    pub message: String,
}

/// Validator for the `containers` list of a compose definition.
#[derive(Debug, Default)]
pub struct ContainerValidator;

impl ContainerValidator {
    /// Creates a new container validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Collects every container issue found in `compose`.
    ///
    /// A definition without a `containers` field has nothing to check.
    #[must_use]
    pub fn issues(&self, compose: &Value) -> Vec<ContainerIssue> {
        let Some(containers) = compose.get(CONTAINERS_FIELD) else {
            return Vec::new();
        };

        let Some(entries) = containers.as_array() else {
            return vec![ContainerIssue {
                container: String::from(CONTAINERS_FIELD),
                message: format!("Compose definition field '{CONTAINERS_FIELD}' must be a list"),
            }];
        };

        entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| Self::check_entry(i, entry))
            .collect()
    }

    /// Validates `compose`, failing on the first container issue.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending container.
    pub fn validate(&self, compose: &Value) -> Result<(), ReconcileError> {
        let issues = self.issues(compose);
        match issues.into_iter().next() {
            Some(issue) => Err(ReconcileError::validation(issue.message)),
            None => {
                debug!("Compose definition containers passed validation");
                Ok(())
            }
        }
    }

    /// Checks a single container entry.
    fn check_entry(index: usize, entry: &Value) -> Option<ContainerIssue> {
        let container = entry
            .get("name")
            .and_then(Value::as_str)
            .map_or_else(|| format!("#{index}"), String::from);

        if !entry.is_object() {
            return Some(ContainerIssue {
                message: format!("Container '{container}' must be an object"),
                container,
            });
        }

        let has_reference = match entry.get(IMAGE_REFERENCE_FIELD) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        };

        if has_reference {
            None
        } else {
            Some(ContainerIssue {
                message: format!(
                    "Container '{container}' is missing required field '{IMAGE_REFERENCE_FIELD}'"
                ),
                container,
            })
        }
    }
}
