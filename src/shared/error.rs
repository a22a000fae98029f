//! Shared Error Types
//!
//! Errors raised while checking client-supplied data before it reaches the
//! auth or feedback flows. They carry the offending field so clients can
//! highlight the right input.
//!
//! # Usage
//!
//! ```rust
//! use anonbox::shared::error::SharedError;
//!
//! let error = SharedError::validation("username", "Username must be 3-20 characters");
//! assert_eq!(error.field(), "username");
//! ```
use thiserror::Error;

/// Validation failures shared by every request type
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the rejected field
    pub fn field(&self) -> &str {
        match self {
            Self::ValidationError { field, .. } => field,
        }
    }

    /// Message without the field prefix, suitable for API responses
    pub fn detail(&self) -> &str {
        match self {
            Self::ValidationError { message, .. } => message,
        }
    }
}
