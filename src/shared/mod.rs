//! Shared Module
//!
//! Types and rules that do not depend on the server runtime: field
//! validation and the error it produces. Any client that wants to mirror the
//! server's checks can use these without pulling in axum or sqlx.

/// Shared error types
pub mod error;

/// Field validation rules
pub mod validation;

pub use error::SharedError;
