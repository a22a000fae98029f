//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs        - Module exports and documentation
//! ├── router.rs     - Main router creation, tracing layer, fallback
//! └── api_routes.rs - Auth and feedback route tables
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use anonbox::backend::routes::create_router;
//! use anonbox::backend::server::state::AppState;
//!
//! fn build(app_state: AppState) -> axum::Router {
//!     create_router(app_state)
//! }
//! ```

/// Main router creation
pub mod router;

/// Auth and feedback route tables
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
