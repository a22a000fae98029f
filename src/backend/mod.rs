//! Backend Module
//!
//! This module contains all server-side code: the Axum HTTP server, the
//! auth flows, the feedback routes and their storage and mail backends.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Registration, verification, password hashing, JWT tokens
//! - **`middleware`** - Bearer token extractors
//! - **`feedback`** - Anonymous messages and the owner inbox
//! - **`store`** - Storage traits with Postgres and in-memory backends
//! - **`email`** - Outbound mail
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request extractors
//! ├── feedback/       - Feedback handlers and message queries
//! ├── store/          - Storage backends
//! ├── email/          - Mailers and templates
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds immutable settings and `Arc`s to the services. All
//! mutable data lives in the store, so handlers share nothing else.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication and user management
pub mod auth;

/// Request extractors for protected routes
pub mod middleware;

/// Anonymous feedback
pub mod feedback;

/// Storage traits and backends
pub mod store;

/// Outbound email
pub mod email;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::create_app;
