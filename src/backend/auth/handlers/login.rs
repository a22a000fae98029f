/**
 * Session Handlers
 *
 * - POST /auth/login - credentials in, token pair out
 * - POST /auth/refresh - refresh cookie in, new token pair out
 * - POST /auth/logout - expires the refresh cookie
 *
 * # Security
 *
 * - Unknown user and wrong password return the same 401 body
 * - The refresh token is set as an `HttpOnly; Secure; SameSite=Lax` cookie
 * - Superseded refresh tokens stay valid until they expire; there is no
 *   server-side session table to revoke them from
 */

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use crate::backend::auth::cookies;
use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest, MessageResponse};
use crate::backend::auth::service::{AuthService, LoginOutcome};
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - unknown identifier or wrong password
/// * `403 Forbidden` - correct password, email not yet verified
///
/// # Example Request
///
/// ```http
/// POST /auth/login HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "identifier": "alice",
///   "password": "secret1"
/// }
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "access_token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "refresh_token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "token_type": "bearer",
///   "user": {
///     "id": "123e4567-e89b-12d3-a456-426614174000",
///     "username": "alice",
///     "email": "alice@example.com",
///     "is_verified": true,
///     "is_accepting_messages": true,
///     "created_at": "2024-01-01T00:00:00Z"
///   }
/// }
/// ```
pub async fn login(
    State(auth): State<Arc<AuthService>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Response, BackendError> {
    let outcome = auth.login(&request.identifier, &request.password).await?;
    session_response(&auth, outcome)
}

/// Refresh handler
///
/// Reads the `refresh_token` cookie, issues a new pair and overwrites the
/// cookie.
pub async fn refresh(
    State(auth): State<Arc<AuthService>>,
    headers: HeaderMap,
) -> Result<Response, BackendError> {
    let token = cookies::extract_refresh_token(&headers);
    let outcome = auth.refresh(token.as_deref()).await?;
    session_response(&auth, outcome)
}

/// Logout handler
pub async fn logout() -> impl IntoResponse {
    (
        [(SET_COOKIE, cookies::clear_refresh_cookie())],
        Json(MessageResponse::new("Successfully logged out")),
    )
}

fn session_response(auth: &AuthService, outcome: LoginOutcome) -> Result<Response, BackendError> {
    let cookie = cookies::refresh_cookie(&outcome.tokens.refresh_token, auth.refresh_ttl())
        .map_err(|e| {
            tracing::error!("Failed to encode refresh cookie: {}", e);
            BackendError::internal("cookie encoding failed")
        })?;

    let body = AuthResponse::bearer(
        outcome.tokens.access_token,
        outcome.tokens.refresh_token,
        &outcome.user,
    );

    Ok(([(SET_COOKIE, cookie)], Json(body)).into_response())
}
