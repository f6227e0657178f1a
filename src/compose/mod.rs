//! Compose definition handling.
//!
//! The compose definition is treated as an opaque JSON document. This module
//! only prunes null values before transmission and checks that containers
//! carry an image reference before an update is submitted.

mod containers;
mod sanitize;

pub use containers::{ContainerIssue, ContainerValidator, IMAGE_REFERENCE_FIELD};
pub use sanitize::{sanitize, sanitize_owned};
