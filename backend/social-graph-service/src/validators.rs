//! Input validation utilities for social graph service

use validator::ValidationError;

use crate::error::{AppError, Result};

/// validator crate compatible custom validator rejecting empty or whitespace-only text
pub fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

/// Service-level guard for callers that bypass the HTTP DTOs
pub fn require_not_blank(field: &str, value: &str) -> Result<()> {
    not_blank(value).map_err(|_| AppError::Validation(format!("{} cannot be empty", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank("  \n\t").is_err());
    }

    #[test]
    fn test_require_not_blank_names_field() {
        let err = require_not_blank("Content", " ").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Content cannot be empty");
    }
}
