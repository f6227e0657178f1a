//! Classification of control-plane failures.
//!
//! Raw client failures come in several shapes. [`classify`] reduces each one
//! to a [`ClassifiedError`], the only failure type the probe and the
//! reconciler branch on.

use tracing::debug;

use crate::error::{ApiError, ClassifiedError};

/// HTTP status reported for missing resources.
const NOT_FOUND_STATUS: u16 = 404;

/// Message fragments that indicate a missing resource.
const NOT_FOUND_MARKERS: &[&str] = &["not found", "does not exist", "no such environment"];

/// Maps a raw client failure to its classified outcome.
#[must_use]
pub fn classify(error: &ApiError) -> ClassifiedError {
    let classified = match error {
        ApiError::Http { status, message } => {
            let message = message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(String::from);

            if *status == NOT_FOUND_STATUS || message.as_deref().is_some_and(indicates_absence) {
                ClassifiedError::NotFound { message }
            } else if let Some(message) = message {
                ClassifiedError::Remote { message }
            } else {
                ClassifiedError::Unknown
            }
        }
        ApiError::Network { .. } | ApiError::InvalidResponse { .. } | ApiError::InvalidRequest { .. } => {
            ClassifiedError::Unknown
        }
    };

    debug!("Classified '{error}' as {classified:?}");
    classified
}

/// Returns true if a remote message reports a missing resource.
fn indicates_absence(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    NOT_FOUND_MARKERS.iter().any(|marker| lowered.contains(marker))
}
