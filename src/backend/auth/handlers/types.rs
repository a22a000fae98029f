/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by authentication handlers.
 * These types are shared across register, verify, login and availability handlers.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::auth::users::User;

/// Registration request
///
/// Contains the username, email and password for a new account.
#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    /// 3-20 characters, letters, digits and underscore
    pub username: String,
    pub email: String,
    /// Hashed before storage, never echoed back
    pub password: String,
}

/// Registration response
#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterResponse {
    pub message: String,
    pub username: String,
    pub email: String,
}

/// Query string of the verification link
#[derive(Deserialize, Debug)]
pub struct VerifyEmailQuery {
    pub token: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ResendVerificationRequest {
    pub email: String,
}

/// Login request
///
/// `identifier` matches either the username or the email address. Clients
/// that send the field as `username` are accepted too.
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    pub identifier: String,
    pub password: String,
}

/// Auth response
///
/// Returned by login and refresh. The refresh token is also set as an
/// `HttpOnly` cookie.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `"bearer"`
    pub token_type: String,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn bearer(access_token: String, refresh_token: String, user: &User) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
            user: UserResponse::from(user),
        }
    }
}

/// User response (without sensitive data)
///
/// Contains user information that is safe to return to clients.
/// Does not include the password hash or the pending verification token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_verified: bool,
    pub is_accepting_messages: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            is_verified: user.is_verified,
            is_accepting_messages: user.is_accepting_messages,
            created_at: user.created_at,
        }
    }
}

/// Plain acknowledgement
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct UsernameQuery {
    pub username: String,
}

#[derive(Deserialize, Debug)]
pub struct EmailQuery {
    pub email: String,
}

/// Availability probe result
#[derive(Serialize, Deserialize, Debug)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub message: String,
}
