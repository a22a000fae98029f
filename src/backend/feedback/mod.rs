//! Feedback Module
//!
//! Anonymous messages addressed to a username, and the owner-side inbox.
//!
//! # Module Structure
//!
//! ```text
//! feedback/
//! ├── mod.rs      - Module exports
//! ├── db.rs       - Message model and database operations
//! ├── types.rs    - Request and response types
//! └── handlers.rs - HTTP handlers
//! ```

/// Message model and database operations
pub mod db;

pub mod types;

/// HTTP handlers for public and owner routes
pub mod handlers;

pub use db::Message;
pub use handlers::{
    count_messages, dashboard, delete_message, list_messages, public_profile, submit_feedback,
    toggle_messages,
};
