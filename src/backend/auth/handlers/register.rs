/**
 * Registration Handler
 *
 * POST /auth/register
 *
 * Creates an unverified account and mails its verification link. The mail
 * is sent in the background, so a relay outage never fails registration;
 * the user can ask for a new link through /auth/resend-verification.
 *
 * # Errors
 *
 * * `422 Unprocessable Entity` - username, email or password fails validation
 * * `409 Conflict` - username or email already registered
 * * `500 Internal Server Error` - hashing, signing or storage failure
 */

use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;

use crate::backend::auth::handlers::types::{RegisterRequest, RegisterResponse};
use crate::backend::auth::service::AuthService;
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;

pub const REGISTERED_MESSAGE: &str =
    "User registered successfully. Please check your email to verify your account.";

/// Register handler
///
/// # Example Request
///
/// ```http
/// POST /auth/register HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "email": "alice@example.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "message": "User registered successfully. Please check your email to verify your account.",
///   "username": "alice",
///   "email": "alice@example.com"
/// }
/// ```
pub async fn register(
    State(auth): State<Arc<AuthService>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), BackendError> {
    tracing::info!("Registration request for username: {}", request.username);

    let user = auth
        .register(&request.username, &request.email, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: REGISTERED_MESSAGE.to_string(),
            username: user.username,
            email: user.email,
        }),
    ))
}
