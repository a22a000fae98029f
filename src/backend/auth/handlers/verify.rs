/**
 * Email Verification Handlers
 *
 * - GET /auth/verify-email?token=... - target of the emailed link
 * - POST /auth/resend-verification - issue a fresh link, superseding the old one
 */

use axum::{
    extract::State,
    response::Json,
};
use std::sync::Arc;

use crate::backend::auth::handlers::types::{
    MessageResponse, ResendVerificationRequest, VerifyEmailQuery,
};
use crate::backend::auth::service::{AuthService, VerificationOutcome};
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, ApiQuery};

/// Resend reply, identical whether or not the address has an account
pub const RESEND_MESSAGE: &str =
    "If an account with that email exists, a new verification link has been sent.";

/// Verify email handler
///
/// Repeating a successful verification is not an error.
///
/// # Errors
///
/// * `400 Bad Request` - token invalid, expired or superseded
/// * `404 Not Found` - no account for the token's address
pub async fn verify_email(
    State(auth): State<Arc<AuthService>>,
    ApiQuery(query): ApiQuery<VerifyEmailQuery>,
) -> Result<Json<MessageResponse>, BackendError> {
    let message = match auth.verify_email(&query.token).await? {
        VerificationOutcome::Verified(_) => "Email verified successfully",
        VerificationOutcome::AlreadyVerified(_) => "Email already verified",
    };
    Ok(Json(MessageResponse::new(message)))
}

/// Resend verification handler
///
/// # Errors
///
/// * `409 Conflict` - account already verified
/// * `503 Service Unavailable` - the mail relay refused the message
pub async fn resend_verification(
    State(auth): State<Arc<AuthService>>,
    ApiJson(request): ApiJson<ResendVerificationRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    auth.resend_verification(&request.email).await?;
    Ok(Json(MessageResponse::new(RESEND_MESSAGE)))
}
