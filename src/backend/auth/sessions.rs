/**
 * Session Tokens
 *
 * This module issues and parses the three kinds of signed JWTs the service
 * hands out:
 *
 * - `verification` - proves control of an email address, lifetime in hours
 * - `access` - authenticates API calls, lifetime in minutes
 * - `refresh` - mints new access tokens, lifetime in days
 *
 * Verification and access tokens are signed with the primary key; refresh
 * tokens use a separate key, so a token of one family never validates as the
 * other. Within the primary key family the `type` claim keeps verification
 * and access tokens apart.
 *
 * Every token carries a random `jti`, so two tokens issued for the same user
 * within the same second are still distinct strings.
 */

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::server::config::AuthSettings;

/// Purpose a token was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Verification,
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verification => "verification",
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }

    /// Access and refresh tokens identify an account by ID
    fn requires_user_id(&self) -> bool {
        matches!(self, Self::Access | Self::Refresh)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Email address of the account
    pub sub: String,
    /// Account ID, present on access and refresh tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Unique token ID
    pub jti: Uuid,
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

/// Reasons a token was not accepted
///
/// Callers collapse all parse failures into one client-facing error; the
/// variants exist for logs and tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token signature is invalid")]
    BadSignature,

    #[error("expected a {expected} token, got {actual}")]
    WrongKind {
        expected: TokenKind,
        actual: TokenKind,
    },

    #[error("token is missing the '{0}' claim")]
    MissingClaim(String),

    #[error("token is malformed")]
    Malformed,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::BadSignature,
            ErrorKind::MissingRequiredClaim(claim) => Self::MissingClaim(claim.clone()),
            _ => Self::Malformed,
        }
    }
}

/// Access and refresh token pair handed out at login and refresh
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Issues and parses every token kind with the configured keys
pub struct TokenCodec {
    algorithm: Algorithm,
    primary: SigningKey,
    refresh: SigningKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    verification_ttl: Duration,
}

impl TokenCodec {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            algorithm: settings.algorithm,
            primary: SigningKey::from_secret(settings.secret_key.expose()),
            refresh: SigningKey::from_secret(settings.refresh_secret_key.expose()),
            access_ttl: settings.access_token_ttl,
            refresh_ttl: settings.refresh_token_ttl,
            verification_ttl: settings.verification_token_ttl,
        }
    }

    fn key_for(&self, kind: TokenKind) -> &SigningKey {
        match kind {
            TokenKind::Verification | TokenKind::Access => &self.primary,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Configured lifetime for a token kind
    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Verification => self.verification_ttl,
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    /// Sign a token of `kind` for `subject` that expires after `ttl`
    pub fn issue(
        &self,
        kind: TokenKind,
        subject: &str,
        user_id: Option<Uuid>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing("expiry is out of range".to_string()))?;
        let claims = Claims {
            sub: subject.to_string(),
            user_id,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4(),
            kind,
        };

        encode(
            &Header::new(self.algorithm),
            &claims,
            &self.key_for(kind).encoding,
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return its claims
    ///
    /// Checks, in order: signature under the key for `expected`, expiry
    /// against the current time with no leeway, presence of `exp` and `sub`,
    /// the `type` claim, and `user_id` for access and refresh tokens.
    pub fn parse(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.key_for(expected).decoding, &validation)?.claims;

        if claims.kind != expected {
            return Err(TokenError::WrongKind {
                expected,
                actual: claims.kind,
            });
        }
        if claims.sub.is_empty() {
            return Err(TokenError::MissingClaim("sub".to_string()));
        }
        if expected.requires_user_id() && claims.user_id.is_none() {
            return Err(TokenError::MissingClaim("user_id".to_string()));
        }

        Ok(claims)
    }

    /// Token mailed to a new account to prove control of `email`
    pub fn issue_verification(&self, email: &str) -> Result<String, TokenError> {
        self.issue(TokenKind::Verification, email, None, self.verification_ttl)
    }

    pub fn issue_access(&self, user: &User) -> Result<String, TokenError> {
        self.issue(TokenKind::Access, &user.email, Some(user.id), self.access_ttl)
    }

    pub fn issue_refresh(&self, user: &User) -> Result<String, TokenError> {
        self.issue(TokenKind::Refresh, &user.email, Some(user.id), self.refresh_ttl)
    }

    /// Fresh access and refresh pair for a logged-in user
    pub fn issue_session(&self, user: &User) -> Result<SessionTokens, TokenError> {
        Ok(SessionTokens {
            access_token: self.issue_access(user)?,
            refresh_token: self.issue_refresh(user)?,
        })
    }
}
