//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for authentication endpoints.
//! Handlers are thin: they parse the request, call `AuthService` and shape
//! the response.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs          - Module exports and documentation
//! ├── types.rs        - Request and response types
//! ├── register.rs     - Account registration
//! ├── verify.rs       - Email verification and resend
//! ├── login.rs        - Login, refresh and logout
//! └── availability.rs - Username and email availability probes
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: username, email, password -> unverified account -> link mailed
//! 2. **Verify**: link token -> account verified -> welcome mail
//! 3. **Login**: identifier and password -> access token + refresh cookie
//! 4. **Refresh**: refresh cookie -> new access token + new refresh cookie
//! 5. **Logout**: refresh cookie expired
//!
//! # Example
//!
//! ```rust,no_run
//! use anonbox::backend::auth::handlers::{login, register};
//! use anonbox::backend::server::AppState;
//! use axum::{routing::post, Router};
//!
//! let router: Router<AppState> = Router::new()
//!     .route("/auth/register", post(register))
//!     .route("/auth/login", post(login));
//! ```

/// Request and response types
pub mod types;

pub mod register;

/// Verification and resend handlers
pub mod verify;

/// Login, refresh and logout handlers
pub mod login;

pub mod availability;

// Re-export commonly used types
pub use types::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

// Re-export handlers
pub use availability::{check_email, check_username};
pub use login::{login, logout, refresh};
pub use register::register;
pub use verify::{resend_verification, verify_email};
