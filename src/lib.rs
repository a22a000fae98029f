//! anonbox - Anonymous Feedback Backend
//!
//! Users register, confirm their email address, log in, and share a public
//! link at which anyone can leave them an anonymous message. The core of the
//! crate is the account and token lifecycle behind that.
//!
//! # Module Structure
//!
//! - **`shared`** - Types with no server dependencies
//!   - Field validation rules
//!   - Validation error type
//!
//! - **`backend`** - Axum HTTP server
//!   - Registration, email verification, login, refresh and logout
//!   - Bearer token extractors for protected routes
//!   - Feedback submission and the owner inbox
//!   - Postgres and in-memory stores, SMTP and in-memory mailers
//!
//! # Usage
//!
//! ```rust,no_run
//! use anonbox::backend::server::{config::Settings, create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(Settings::from_env()?).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::SharedError` for validation failures
//! - `backend::error::BackendError` for everything a handler can return,
//!   rendered as `{"error": ..., "status": ...}`
//! - Narrow `thiserror` enums in the lower layers (`TokenError`,
//!   `StoreError`, `MailError`, `ConfigError`)

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
