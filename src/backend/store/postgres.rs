//! Postgres storage backend
//!
//! Thin adapter from the storage traits to the query functions in
//! `auth::users` and `feedback::db`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{MessageStore, StoreError, StoreResult, UniqueField, UserStore};
use crate::backend::auth::users::{self, NewUser, User};
use crate::backend::feedback::db::{self, Message};

/// Store backed by a Postgres connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate unique-constraint violations into `StoreError::Duplicate`
fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some(name) if name.contains("email") => UniqueField::Email,
                _ => UniqueField::Username,
            };
            return StoreError::Duplicate(field);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, new_user: NewUser) -> StoreResult<User> {
        users::create_user(&self.pool, new_user)
            .await
            .map_err(map_insert_error)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(users::get_user_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(users::get_user_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(users::get_user_by_username(&self.pool, username).await?)
    }

    async fn find_user_by_identifier(&self, identifier: &str) -> StoreResult<Option<User>> {
        Ok(users::get_user_by_identifier(&self.pool, identifier).await?)
    }

    async fn username_taken(&self, username: &str) -> StoreResult<bool> {
        Ok(users::username_exists(&self.pool, username).await?)
    }

    async fn email_taken(&self, email: &str) -> StoreResult<bool> {
        Ok(users::email_exists(&self.pool, email).await?)
    }

    async fn mark_verified(&self, id: Uuid, token: &str) -> StoreResult<Option<User>> {
        Ok(users::mark_user_verified(&self.pool, id, token).await?)
    }

    async fn replace_verification_token(&self, id: Uuid, token: &str) -> StoreResult<bool> {
        Ok(users::replace_verification_token(&self.pool, id, token).await?)
    }

    async fn set_accepting_messages(&self, id: Uuid, accepting: bool) -> StoreResult<Option<User>> {
        Ok(users::set_accepting_messages(&self.pool, id, accepting).await?)
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn insert_message(&self, recipient_id: Uuid, content: &str) -> StoreResult<Message> {
        Ok(db::insert_message(&self.pool, recipient_id, content).await?)
    }

    async fn list_messages(&self, recipient_id: Uuid) -> StoreResult<Vec<Message>> {
        Ok(db::get_messages_for_recipient(&self.pool, recipient_id).await?)
    }

    async fn count_messages(&self, recipient_id: Uuid) -> StoreResult<i64> {
        Ok(db::count_messages_for_recipient(&self.pool, recipient_id).await?)
    }

    async fn delete_message(&self, recipient_id: Uuid, message_id: Uuid) -> StoreResult<bool> {
        Ok(db::delete_message_for_recipient(&self.pool, recipient_id, message_id).await?)
    }
}
