/**
 * Authentication Extractors
 *
 * Protected routes take one of two extractors as a handler argument:
 *
 * - `CurrentUser` - a valid access token whose user still exists
 * - `VerifiedUser` - `CurrentUser`, then the verified-email gate
 *
 * The order is fixed: identity is always resolved before the verification
 * check, so a bad token is a 401 even for an unverified account.
 *
 * Every credential failure (missing header, wrong scheme, bad signature,
 * expiry, wrong token kind, deleted user) produces the same 401 with
 * `WWW-Authenticate: Bearer`. The specific cause is only logged.
 */

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::backend::auth::sessions::{TokenCodec, TokenKind};
use crate::backend::auth::users::User;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::backend::store::{Store, UserStore};

/// Returned to authenticated but unverified callers of gated routes
pub const EMAIL_NOT_VERIFIED: &str =
    "Email not verified. Please verify your email to access this resource.";

/// Read the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolve an access token to the user it names
pub async fn resolve_user(
    tokens: &TokenCodec,
    store: &dyn Store,
    credential: Option<&str>,
) -> Result<User, BackendError> {
    let Some(token) = credential else {
        tracing::debug!("Missing bearer credential");
        return Err(BackendError::credentials_rejected());
    };

    let claims = tokens.parse(token, TokenKind::Access).map_err(|e| {
        tracing::debug!("Access token rejected: {}", e);
        BackendError::credentials_rejected()
    })?;
    let user_id = claims.user_id.ok_or_else(BackendError::credentials_rejected)?;

    store.find_user_by_id(user_id).await?.ok_or_else(|| {
        tracing::warn!(user_id = %user_id, "Access token for missing user");
        BackendError::credentials_rejected()
    })
}

/// Pass verified users through, refuse the rest
pub fn require_verified(user: User) -> Result<User, BackendError> {
    if user.is_verified {
        Ok(user)
    } else {
        tracing::debug!(user_id = %user.id, "Unverified user refused");
        Err(BackendError::forbidden(EMAIL_NOT_VERIFIED))
    }
}

/// Any authenticated user, verified or not
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let credential = extract_bearer_token(&parts.headers);
        let user = resolve_user(&state.tokens, state.store.as_ref(), credential).await?;
        Ok(CurrentUser(user))
    }
}

/// An authenticated user whose email address is confirmed
#[derive(Clone, Debug)]
pub struct VerifiedUser(pub User);

impl FromRequestParts<AppState> for VerifiedUser {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        require_verified(user).map(VerifiedUser)
    }
}
