//! Storage Module
//!
//! Abstract storage interfaces for users and feedback messages, plus two
//! backends:
//!
//! - **`postgres`** - `PgStore`, the production backend over a `PgPool`
//! - **`memory`** - `MemoryStore`, a lock-guarded in-process backend for
//!   tests and local runs without a database
//!
//! Both enforce the same invariants: unique usernames and emails on insert,
//! a verification that succeeds at most once per outstanding token, and
//! messages that only their recipient can list or delete.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::users::{NewUser, User};
use crate::backend::feedback::db::Message;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Column a uniqueness violation was reported against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

/// Storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert collided with an existing username or email
    #[error("{0:?} is already taken")]
    Duplicate(UniqueField),

    /// Any other backend failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// User persistence interface
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert an unverified account; duplicates fail with `StoreError::Duplicate`
    async fn insert_user(&self, new_user: NewUser) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Exact-match email lookup
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Exact-match username lookup
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Match either the username or the email
    async fn find_user_by_identifier(&self, identifier: &str) -> StoreResult<Option<User>>;

    /// Case-insensitive availability probe
    async fn username_taken(&self, username: &str) -> StoreResult<bool>;

    /// Case-insensitive availability probe
    async fn email_taken(&self, email: &str) -> StoreResult<bool>;

    /// Atomically mark verified and clear the token, if `token` is the
    /// outstanding one. Returns the updated user, or `None` when the
    /// condition did not hold.
    async fn mark_verified(&self, id: Uuid, token: &str) -> StoreResult<Option<User>>;

    /// Supersede the outstanding verification token of an unverified account
    async fn replace_verification_token(&self, id: Uuid, token: &str) -> StoreResult<bool>;

    async fn set_accepting_messages(&self, id: Uuid, accepting: bool) -> StoreResult<Option<User>>;
}

/// Feedback message persistence interface
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert_message(&self, recipient_id: Uuid, content: &str) -> StoreResult<Message>;

    /// Messages for a recipient, newest first
    async fn list_messages(&self, recipient_id: Uuid) -> StoreResult<Vec<Message>>;

    async fn count_messages(&self, recipient_id: Uuid) -> StoreResult<i64>;

    /// Delete one of the recipient's messages; `false` if no such message
    async fn delete_message(&self, recipient_id: Uuid, message_id: Uuid) -> StoreResult<bool>;
}

/// Combined store handed to the application state
pub trait Store: UserStore + MessageStore {}

impl<T> Store for T where T: UserStore + MessageStore {}
