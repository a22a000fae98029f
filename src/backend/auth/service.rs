/**
 * Auth Flow Orchestration
 *
 * Sequences the hasher, token codec, store and mailer into the account
 * lifecycle:
 *
 * ```text
 * (none) --register--> unverified --verify_email--> verified
 * verified --login / refresh--> verified (new token pair each time)
 * ```
 *
 * Handlers stay thin: they parse the request, call one method here and shape
 * the response. Every failure comes back as a `BackendError` with its final
 * HTTP meaning already decided.
 *
 * # Email Delivery
 *
 * Registration and verification mail is fire-and-forget: the send runs on a
 * detached task and a failure is only logged. `resend_verification` awaits
 * the send, because delivering the mail is the whole point of that call.
 *
 * # Hashing
 *
 * bcrypt is CPU-bound, so hashing and verification run on the blocking pool.
 */

use std::sync::Arc;

use crate::backend::auth::password::PasswordHasher;
use crate::backend::auth::sessions::{SessionTokens, TokenCodec, TokenKind};
use crate::backend::auth::users::{NewUser, User};
use crate::backend::email::{templates, Mailer, OutboundEmail};
use crate::backend::error::{BackendError, LOGIN_REJECTED};
use crate::backend::server::config::LinkSettings;
use crate::backend::store::{Store, UserStore};
use crate::shared::validation;

/// Returned when a correct password belongs to an unverified account
pub const LOGIN_UNVERIFIED: &str =
    "Email not verified. Please verify your email before logging in.";

/// Result of a verification attempt that did not fail
#[derive(Debug, Clone)]
pub enum VerificationOutcome {
    /// This call flipped the account to verified
    Verified(User),
    /// The account was verified before this call
    AlreadyVerified(User),
}

/// Successful login or refresh
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub tokens: SessionTokens,
}

pub struct AuthService {
    store: Arc<dyn Store>,
    tokens: Arc<TokenCodec>,
    hasher: PasswordHasher,
    mailer: Arc<dyn Mailer>,
    links: LinkSettings,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn Store>,
        tokens: Arc<TokenCodec>,
        hasher: PasswordHasher,
        mailer: Arc<dyn Mailer>,
        links: LinkSettings,
    ) -> Self {
        Self {
            store,
            tokens,
            hasher,
            mailer,
            links,
        }
    }

    /// Lifetime of the refresh token, used for the cookie `Max-Age`
    pub fn refresh_ttl(&self) -> chrono::Duration {
        self.tokens.ttl(TokenKind::Refresh)
    }

    /// Create an unverified account and mail its verification link
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, BackendError> {
        validation::validate_username(username)?;
        validation::validate_email(email)?;
        validation::validate_password(password)?;

        if self.store.find_user_by_username(username).await?.is_some() {
            tracing::warn!("Username already exists: {}", username);
            return Err(BackendError::conflict("Username already taken"));
        }
        if self.store.find_user_by_email(email).await?.is_some() {
            tracing::warn!("Email already exists: {}", email);
            return Err(BackendError::conflict("Email already registered"));
        }

        let password_hash = self.hash_password(password).await?;
        let verification_token = self.tokens.issue_verification(email).map_err(|e| {
            tracing::error!("Failed to issue verification token: {}", e);
            BackendError::internal("token issuance failed")
        })?;

        // Unique constraints still decide races between the checks above and this insert
        let user = self
            .store
            .insert_user(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                verification_token: verification_token.clone(),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered: {}", user.username);

        self.spawn_delivery(self.verification_email(&user, &verification_token));
        Ok(user)
    }

    /// Confirm an email address with a verification token
    pub async fn verify_email(&self, token: &str) -> Result<VerificationOutcome, BackendError> {
        let claims = self
            .tokens
            .parse(token, TokenKind::Verification)
            .map_err(|e| {
                tracing::debug!("Verification token rejected: {}", e);
                BackendError::InvalidToken
            })?;

        let user = self
            .store
            .find_user_by_email(&claims.sub)
            .await?
            .ok_or_else(|| BackendError::not_found("User not found"))?;

        if user.is_verified {
            return Ok(VerificationOutcome::AlreadyVerified(user));
        }

        if user.verification_token.as_deref() != Some(token) {
            tracing::warn!(user_id = %user.id, "Superseded verification token presented");
            return Err(BackendError::InvalidToken);
        }

        match self.store.mark_verified(user.id, token).await? {
            Some(verified) => {
                tracing::info!(user_id = %verified.id, "Email verified");
                let welcome = templates::welcome_email(
                    &verified.email,
                    &verified.username,
                    &self.links.profile_link(&verified.username),
                );
                self.spawn_delivery(welcome);
                Ok(VerificationOutcome::Verified(verified))
            }
            None => {
                // A concurrent call changed the row between our read and the update
                match self.store.find_user_by_id(user.id).await? {
                    Some(current) if current.is_verified => {
                        Ok(VerificationOutcome::AlreadyVerified(current))
                    }
                    _ => Err(BackendError::InvalidToken),
                }
            }
        }
    }

    /// Authenticate by username or email and issue a token pair
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginOutcome, BackendError> {
        let Some(user) = self.store.find_user_by_identifier(identifier).await? else {
            tracing::warn!("Login failed: unknown identifier");
            return Err(BackendError::unauthorized(LOGIN_REJECTED));
        };

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(BackendError::unauthorized(LOGIN_REJECTED));
        }

        if !user.is_verified {
            tracing::info!(user_id = %user.id, "Login refused: email not verified");
            return Err(BackendError::forbidden(LOGIN_UNVERIFIED));
        }

        let tokens = self.issue_session(&user)?;
        tracing::info!(user_id = %user.id, "User logged in: {}", user.username);
        Ok(LoginOutcome { user, tokens })
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh(&self, refresh_token: Option<&str>) -> Result<LoginOutcome, BackendError> {
        let token = refresh_token.ok_or_else(|| {
            tracing::debug!("Refresh attempted without cookie");
            BackendError::credentials_rejected()
        })?;

        let claims = self.tokens.parse(token, TokenKind::Refresh).map_err(|e| {
            tracing::debug!("Refresh token rejected: {}", e);
            BackendError::credentials_rejected()
        })?;
        let user_id = claims.user_id.ok_or_else(BackendError::credentials_rejected)?;

        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = %user_id, "Refresh token for missing user");
                BackendError::credentials_rejected()
            })?;

        if !user.is_verified {
            return Err(BackendError::forbidden(LOGIN_UNVERIFIED));
        }

        let tokens = self.issue_session(&user)?;
        tracing::debug!(user_id = %user.id, "Session refreshed");
        Ok(LoginOutcome { user, tokens })
    }

    /// Issue a new verification token and mail it
    ///
    /// Unknown addresses succeed silently so the endpoint cannot be used to
    /// probe for accounts.
    pub async fn resend_verification(&self, email: &str) -> Result<(), BackendError> {
        validation::validate_email(email)?;

        let Some(user) = self.store.find_user_by_email(email).await? else {
            tracing::info!("Verification resend requested for unknown address");
            return Ok(());
        };

        if user.is_verified {
            return Err(BackendError::conflict("Email is already verified"));
        }

        let token = self.tokens.issue_verification(&user.email).map_err(|e| {
            tracing::error!("Failed to issue verification token: {}", e);
            BackendError::internal("token issuance failed")
        })?;

        if !self.store.replace_verification_token(user.id, &token).await? {
            return Err(BackendError::conflict("Email is already verified"));
        }

        self.mailer
            .send(self.verification_email(&user, &token))
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.id, "Failed to resend verification email: {}", e);
                BackendError::unavailable(
                    "Failed to send verification email. Please try again later.",
                )
            })?;

        tracing::info!(user_id = %user.id, "Verification email resent");
        Ok(())
    }

    /// Whether `username` is free, ignoring case
    pub async fn username_available(&self, username: &str) -> Result<bool, BackendError> {
        validation::validate_username(username)?;
        Ok(!self.store.username_taken(username).await?)
    }

    /// Whether `email` is free, ignoring case
    pub async fn email_available(&self, email: &str) -> Result<bool, BackendError> {
        validation::validate_email(email)?;
        Ok(!self.store.email_taken(email).await?)
    }

    fn issue_session(&self, user: &User) -> Result<SessionTokens, BackendError> {
        self.tokens.issue_session(user).map_err(|e| {
            tracing::error!("Failed to issue session tokens: {}", e);
            BackendError::internal("token issuance failed")
        })
    }

    fn verification_email(&self, user: &User, token: &str) -> OutboundEmail {
        templates::verification_email(
            &user.email,
            &user.username,
            &self.links.verification_link(token),
            self.tokens.ttl(TokenKind::Verification).num_hours(),
        )
    }

    fn spawn_delivery(&self, email: OutboundEmail) {
        let mailer = Arc::clone(&self.mailer);
        tokio::spawn(async move {
            let subject = email.subject.clone();
            if let Err(e) = mailer.send(email).await {
                tracing::error!("Failed to send '{}' email: {}", subject, e);
            }
        });
    }

    async fn hash_password(&self, password: &str) -> Result<String, BackendError> {
        let hasher = self.hasher;
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                tracing::error!("Password hashing task failed: {:?}", e);
                BackendError::internal("password hashing failed")
            })?
            .map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                BackendError::internal("password hashing failed")
            })
    }

    async fn verify_password(&self, password: &str, digest: &str) -> Result<bool, BackendError> {
        let hasher = self.hasher;
        let password = password.to_string();
        let digest = digest.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| {
                tracing::error!("Password verification task failed: {:?}", e);
                BackendError::internal("password verification failed")
            })
    }
}
