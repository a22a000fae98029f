//! Middleware Module
//!
//! Request processing that runs before handlers.
//!
//! - **`auth`** - bearer token extractors for protected routes
//! - **`extract`** - `Json`/`Query` wrappers with JSON error bodies
//!
//! # Example
//!
//! ```rust,no_run
//! use anonbox::backend::middleware::VerifiedUser;
//!
//! async fn handler(VerifiedUser(user): VerifiedUser) -> String {
//!     user.username
//! }
//! ```

pub mod auth;
pub mod extract;

pub use auth::{
    extract_bearer_token, require_verified, resolve_user, CurrentUser, VerifiedUser,
    EMAIL_NOT_VERIFIED,
};
pub use extract::{ApiJson, ApiQuery};
