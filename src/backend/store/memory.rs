//! In-memory storage implementation for development and testing
//!
//! Keeps all users and messages behind a single `tokio::sync::RwLock`.
//! Every mutation runs under one write guard, which gives the same
//! check-and-set atomicity the Postgres backend gets from single statements.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{MessageStore, StoreError, StoreResult, UniqueField, UserStore};
use crate::backend::auth::users::{NewUser, User};
use crate::backend::feedback::db::Message;

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    /// Insertion order, oldest first
    messages: Vec<Message>,
}

/// In-memory store
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut inner = self.inner.write().await;

        if inner.users.values().any(|u| u.username == new_user.username) {
            return Err(StoreError::Duplicate(UniqueField::Username));
        }
        if inner.users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::Duplicate(UniqueField::Email));
        }

        let user = new_user.into_user();
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_identifier(&self, identifier: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        let by_username = inner.users.values().find(|u| u.username == identifier);
        Ok(by_username
            .or_else(|| inner.users.values().find(|u| u.email == identifier))
            .cloned())
    }

    async fn username_taken(&self, username: &str) -> StoreResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(username)))
    }

    async fn email_taken(&self, email: &str) -> StoreResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().any(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn mark_verified(&self, id: Uuid, token: &str) -> StoreResult<Option<User>> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };

        if user.is_verified || user.verification_token.as_deref() != Some(token) {
            return Ok(None);
        }

        user.is_verified = true;
        user.verification_token = None;
        Ok(Some(user.clone()))
    }

    async fn replace_verification_token(&self, id: Uuid, token: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&id) {
            Some(user) if !user.is_verified => {
                user.verification_token = Some(token.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_accepting_messages(&self, id: Uuid, accepting: bool) -> StoreResult<Option<User>> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&id).map(|user| {
            user.is_accepting_messages = accepting;
            user.clone()
        }))
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert_message(&self, recipient_id: Uuid, content: &str) -> StoreResult<Message> {
        let message = Message::new(recipient_id, content);
        self.inner.write().await.messages.push(message.clone());
        Ok(message)
    }

    async fn list_messages(&self, recipient_id: Uuid) -> StoreResult<Vec<Message>> {
        let inner = self.inner.read().await;
        Ok(inner
            .messages
            .iter()
            .rev()
            .filter(|m| m.recipient_id == recipient_id)
            .cloned()
            .collect())
    }

    async fn count_messages(&self, recipient_id: Uuid) -> StoreResult<i64> {
        let inner = self.inner.read().await;
        let count = inner
            .messages
            .iter()
            .filter(|m| m.recipient_id == recipient_id)
            .count();
        Ok(count as i64)
    }

    async fn delete_message(&self, recipient_id: Uuid, message_id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.messages.len();
        inner
            .messages
            .retain(|m| !(m.id == message_id && m.recipient_id == recipient_id));
        Ok(inner.messages.len() != before)
    }
}
