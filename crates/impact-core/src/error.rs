//! Error types for Impact Tracker domain operations.
//!
//! Domain errors are values: constructors that can reject input return
//! `Result<T, CoreError>` and callers decide how to surface them (the server
//! maps validation failures to `400 Bad Request`).

use thiserror::Error;

/// Main error type for domain operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A field failed validation.
    #[error("Validation error for field '{field}': {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },
}

impl CoreError {
    /// Creates a Validation error.
    ///
    /// # Example
    ///
    /// ```
    /// use impact_core::CoreError;
    ///
    /// let error = CoreError::validation("text", "is required");
    /// assert!(error.is_validation_error());
    /// assert_eq!(error.to_string(), "Validation error for field 'text': is required");
    /// ```
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Type alias for Results with CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;
