//! Authentication Module
//!
//! This module handles user registration, email verification and session
//! management. It provides HTTP handlers for authentication endpoints and
//! manages user data, password digests and JWT tokens.
//!
//! # Architecture
//!
//! The auth module is organized into focused submodules:
//!
//! - **`users`** - User data model and database operations
//! - **`password`** - bcrypt hashing
//! - **`sessions`** - JWT issuance and parsing for the three token kinds
//! - **`cookies`** - the refresh token cookie
//! - **`service`** - the flows that tie the above together
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and database operations
//! ├── password.rs     - Password hashing
//! ├── sessions.rs     - JWT token management
//! ├── cookies.rs      - Refresh cookie encoding
//! ├── service.rs      - AuthService flows
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Token Kinds
//!
//! | Kind           | Claims               | Key     | Default lifetime |
//! |----------------|----------------------|---------|------------------|
//! | `verification` | `sub` = email        | primary | 24 hours         |
//! | `access`       | `sub`, `user_id`     | primary | 30 minutes       |
//! | `refresh`      | `sub`, `user_id`     | refresh | 7 days           |
//!
//! Every token carries a `type` claim and is rejected wherever another kind
//! is expected.
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Unknown user and wrong password are indistinguishable to clients
//! - Unverified accounts cannot log in or reach gated routes
//! - The refresh token lives in an `HttpOnly` cookie

/// User data model and database operations
pub mod users;

/// Password hashing
pub mod password;

/// JWT token generation and validation
pub mod sessions;

/// Refresh token cookie
pub mod cookies;

/// Registration, verification and session flows
pub mod service;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use handlers::types::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
pub use service::AuthService;
pub use sessions::{TokenCodec, TokenKind};
pub use users::User;
