/**
 * API Route Handlers
 *
 * This module wires the auth and feedback handlers to their paths.
 *
 * # Routes
 *
 * ## Authentication (public)
 * - `POST /auth/register` - create an unverified account
 * - `GET /auth/verify-email` - confirm the address from the emailed link
 * - `POST /auth/resend-verification` - mail a fresh link
 * - `POST /auth/login` - token pair, refresh cookie set
 * - `POST /auth/refresh` - rotate the token pair from the cookie
 * - `POST /auth/logout` - clear the cookie
 * - `GET /auth/check-username`, `GET /auth/check-email` - availability
 *
 * ## Feedback
 * - `POST /u/{username}`, `GET /u/{username}` - public
 * - `GET /messages`, `GET /messages/count`, `DELETE /messages/{id}`,
 *   `PATCH /toggle-messages`, `GET /dashboard` - verified bearer token
 */

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::backend::auth::handlers::{
    check_email, check_username, login, logout, refresh, register, resend_verification,
    verify_email,
};
use crate::backend::feedback::{
    count_messages, dashboard, delete_message, list_messages, public_profile, submit_feedback,
    toggle_messages,
};
use crate::backend::server::state::AppState;

/// Configure authentication routes
pub fn configure_auth_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/auth/register", post(register))
        .route("/auth/verify-email", get(verify_email))
        .route("/auth/resend-verification", post(resend_verification))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/check-username", get(check_username))
        .route("/auth/check-email", get(check_email))
}

/// Configure feedback routes
///
/// Owner routes authenticate through the `VerifiedUser` extractor in each
/// handler signature rather than a router layer.
pub fn configure_feedback_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/u/{username}", post(submit_feedback).get(public_profile))
        .route("/messages", get(list_messages))
        .route("/messages/count", get(count_messages))
        .route("/messages/{id}", delete(delete_message))
        .route("/toggle-messages", patch(toggle_messages))
        .route("/dashboard", get(dashboard))
}
