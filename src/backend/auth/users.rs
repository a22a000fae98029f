/**
 * User Model and Database Operations
 *
 * This module defines the account record and the Postgres queries that read
 * and mutate it. Higher layers reach these through the `UserStore` trait so
 * the in-memory store can stand in during tests.
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// User struct representing a row of the `users` table
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Username (unique, 3-20 chars, alphanumeric + underscore)
    pub username: String,
    /// User email address (unique)
    pub email: String,
    /// Hashed password (bcrypt)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether the email address has been confirmed
    pub is_verified: bool,
    /// Outstanding verification token, cleared once verified
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    /// Whether anonymous feedback is currently accepted
    pub is_accepting_messages: bool,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a new, unverified account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub verification_token: String,
}

impl NewUser {
    /// Materialize the row as the store will persist it
    pub fn into_user(self) -> User {
        User {
            id: Uuid::new_v4(),
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            is_verified: false,
            verification_token: Some(self.verification_token),
            is_accepting_messages: true,
            created_at: Utc::now(),
        }
    }
}

/// Create a new user
///
/// Unique constraint violations on `username` or `email` surface as
/// `sqlx::Error::Database`; the store layer turns them into conflicts.
pub async fn create_user(pool: &PgPool, new_user: NewUser) -> Result<User, sqlx::Error> {
    let user = new_user.into_user();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, email, password_hash, is_verified, verification_token, is_accepting_messages, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, username, email, password_hash, is_verified, verification_token, is_accepting_messages, created_at
        "#
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.is_verified)
    .bind(&user.verification_token)
    .bind(user.is_accepting_messages)
    .bind(user.created_at)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by ID
pub async fn get_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, is_verified, verification_token, is_accepting_messages, created_at
        FROM users
        WHERE id = $1
        "#
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get user by exact email
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, is_verified, verification_token, is_accepting_messages, created_at
        FROM users
        WHERE email = $1
        "#
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get user by exact username
pub async fn get_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, is_verified, verification_token, is_accepting_messages, created_at
        FROM users
        WHERE username = $1
        "#
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get user whose username or email equals the identifier
pub async fn get_user_by_identifier(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, is_verified, verification_token, is_accepting_messages, created_at
        FROM users
        WHERE username = $1 OR email = $1
        ORDER BY (username = $1) DESC
        LIMIT 1
        "#
    )
    .bind(identifier)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Case-insensitive username existence check
pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users WHERE lower(username) = lower($1))",
    )
    .bind(username)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Case-insensitive email existence check
pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1))")
            .bind(email)
            .fetch_one(pool)
            .await?;

    Ok(exists)
}

/// Flip the account to verified if `token` is still the outstanding one
///
/// The check and both column writes happen in one statement, so two
/// concurrent verifications cannot both succeed.
pub async fn mark_user_verified(
    pool: &PgPool,
    id: Uuid,
    token: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET is_verified = TRUE, verification_token = NULL
        WHERE id = $1 AND verification_token = $2 AND is_verified = FALSE
        RETURNING id, username, email, password_hash, is_verified, verification_token, is_accepting_messages, created_at
        "#
    )
    .bind(id)
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Replace the outstanding verification token of an unverified account
pub async fn replace_verification_token(
    pool: &PgPool,
    id: Uuid,
    token: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET verification_token = $2
        WHERE id = $1 AND is_verified = FALSE
        "#,
    )
    .bind(id)
    .bind(token)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Update whether the user accepts anonymous feedback
pub async fn set_accepting_messages(
    pool: &PgPool,
    id: Uuid,
    accepting: bool,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET is_accepting_messages = $2
        WHERE id = $1
        RETURNING id, username, email, password_hash, is_verified, verification_token, is_accepting_messages, created_at
        "#
    )
    .bind(id)
    .bind(accepting)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
