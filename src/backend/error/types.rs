/**
 * Backend Error Types
 *
 * This module defines the error type returned by every handler, extractor
 * and flow in the backend. Each variant maps to exactly one HTTP status.
 *
 * # Error Categories
 *
 * ## Client Errors
 *
 * - `SharedError` - malformed input (422)
 * - `MalformedRequest` - body or query string could not be decoded (400/415/422)
 * - `InvalidToken` - verification link is unusable (400)
 * - `Unauthorized` - credentials or bearer token rejected (401)
 * - `Forbidden` - authenticated but not allowed, e.g. unverified (403)
 * - `NotFound` - resource absent or hidden (404)
 * - `Conflict` - uniqueness or state conflict (409)
 *
 * ## Server Errors
 *
 * - `ServiceUnavailable` - a collaborator such as the mail relay failed (503)
 * - `Store` - storage failure; duplicates map to 409, everything else to 500
 * - `Internal` - hashing or signing failures (500)
 *
 * Server error details are logged where they occur and never returned to
 * clients.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::store::{StoreError, UniqueField};
use crate::shared::SharedError;

/// Message for every rejected bearer or refresh credential
pub const CREDENTIALS_REJECTED: &str = "Could not validate credentials";

/// Message for a failed login, whatever the cause
pub const LOGIN_REJECTED: &str = "Incorrect username or password";

/// Message returned to clients in place of internal failure details
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Body or query string rejected before reaching the handler
    #[error("Malformed request: {message}")]
    MalformedRequest { status: StatusCode, message: String },

    /// Verification token failed to parse or is no longer outstanding
    #[error("Invalid or expired verification token")]
    InvalidToken,

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not permitted
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A downstream dependency could not complete the request
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),

    /// Shared error (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// The uniform rejection for bad bearer or refresh credentials
    pub fn credentials_rejected() -> Self {
        Self::Unauthorized(CREDENTIALS_REJECTED.to_string())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::SharedError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MalformedRequest { status, .. } => *status,
            Self::InvalidToken => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(StoreError::Duplicate(_)) => StatusCode::CONFLICT,
            Self::Store(StoreError::Database(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the client-facing error message
    pub fn message(&self) -> String {
        match self {
            Self::SharedError(err) => err.detail().to_string(),
            Self::MalformedRequest { message, .. } => message.clone(),
            Self::InvalidToken => self.to_string(),
            Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::ServiceUnavailable(message) => message.clone(),
            Self::Store(StoreError::Duplicate(UniqueField::Username)) => {
                "Username already taken".to_string()
            }
            Self::Store(StoreError::Duplicate(UniqueField::Email)) => {
                "Email already registered".to_string()
            }
            Self::Store(StoreError::Database(_)) | Self::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }

    /// Field name for validation failures
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::SharedError(err) => Some(err.field()),
            _ => None,
        }
    }
}
