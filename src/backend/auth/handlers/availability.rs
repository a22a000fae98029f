/**
 * Availability Handlers
 *
 * - GET /auth/check-username?username=...
 * - GET /auth/check-email?email=...
 *
 * Both comparisons ignore case, so `Alice` is reported taken once `alice`
 * exists.
 */

use axum::{
    extract::State,
    response::Json,
};
use std::sync::Arc;

use crate::backend::auth::handlers::types::{AvailabilityResponse, EmailQuery, UsernameQuery};
use crate::backend::auth::service::AuthService;
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiQuery;

pub async fn check_username(
    State(auth): State<Arc<AuthService>>,
    ApiQuery(query): ApiQuery<UsernameQuery>,
) -> Result<Json<AvailabilityResponse>, BackendError> {
    let available = auth.username_available(&query.username).await?;
    let message = if available {
        "Username is available"
    } else {
        "Username is already taken"
    };

    Ok(Json(AvailabilityResponse {
        available,
        message: message.to_string(),
    }))
}

pub async fn check_email(
    State(auth): State<Arc<AuthService>>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> Result<Json<AvailabilityResponse>, BackendError> {
    let available = auth.email_available(&query.email).await?;
    let message = if available {
        "Email is available"
    } else {
        "Email is already registered"
    };

    Ok(Json(AvailabilityResponse {
        available,
        message: message.to_string(),
    }))
}
