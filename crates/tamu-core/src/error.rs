// Validation error type
//
// Persistence and HTTP error mapping live in tamu-api; the core crate only
// knows how to reject a malformed value.

use thiserror::Error;

/// A single failed validation rule, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
