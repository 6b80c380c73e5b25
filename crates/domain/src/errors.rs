//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Selector decode failure, naming the offending fragment
    #[error("malformed selector segment '{segment}': {reason}")]
    Format { segment: String, reason: String },

    /// Fault rule validation failed
    #[error("invalid fault rule: {0}")]
    Validation(String),
}

impl DomainError {
    /// Create a format error for a malformed selector segment
    pub fn format(segment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            segment: segment.into(),
            reason: reason.into(),
        }
    }

    /// Create a validation error for a missing required field
    pub fn missing_field(field: &str) -> Self {
        Self::Validation(format!("missing required field: {field}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_names_the_segment() {
        let err = DomainError::format("v1rule", "missing '='");
        assert_eq!(
            err.to_string(),
            "malformed selector segment 'v1rule': missing '='"
        );
    }

    #[test]
    fn missing_field_message() {
        let err = DomainError::missing_field("source");
        assert_eq!(err.to_string(), "invalid fault rule: missing required field: source");
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::Validation("no effect specified".to_string());
        assert_eq!(err.to_string(), "invalid fault rule: no effect specified");
    }
}
