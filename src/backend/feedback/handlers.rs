/**
 * Feedback Handlers
 *
 * Public routes take a recipient username and need no credentials. Owner
 * routes take `VerifiedUser` and are always scoped to the caller's own
 * messages; another user's message id behaves exactly like a missing one.
 *
 * # Endpoints
 *
 * - POST /u/{username} - submit anonymous feedback
 * - GET /u/{username} - public profile
 * - GET /messages - caller's inbox, newest first
 * - GET /messages/count - caller's inbox size
 * - DELETE /messages/{id} - remove one of the caller's messages
 * - PATCH /toggle-messages - open or close the inbox
 * - GET /dashboard - profile, count and share link
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::auth::users::User;
use crate::backend::error::BackendError;
use crate::backend::feedback::db::Message;
use crate::backend::feedback::types::{
    DashboardResponse, MessageCountResponse, PublicProfileResponse, SubmitFeedbackRequest,
    SubmitFeedbackResponse, ToggleMessagesRequest, ToggleMessagesResponse,
};
use crate::backend::middleware::{ApiJson, VerifiedUser};
use crate::backend::server::state::AppState;
use crate::backend::store::{MessageStore, Store, UserStore};
use crate::shared::validation;

pub const NOT_ACCEPTING: &str = "This user is not accepting feedback at the moment";

/// Look up a recipient that the public may address
///
/// Unverified accounts are reported as missing.
async fn public_recipient(store: &dyn Store, username: &str) -> Result<User, BackendError> {
    match store.find_user_by_username(username).await? {
        Some(user) if user.is_verified => Ok(user),
        _ => Err(BackendError::not_found("User not found")),
    }
}

/// Submit feedback handler
///
/// # Errors
///
/// * `404 Not Found` - no verified user with that name
/// * `403 Forbidden` - recipient has closed their inbox
/// * `422 Unprocessable Entity` - content empty or longer than 1000 characters
pub async fn submit_feedback(
    State(store): State<Arc<dyn Store>>,
    Path(username): Path<String>,
    ApiJson(request): ApiJson<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<SubmitFeedbackResponse>), BackendError> {
    validation::validate_message_content(&request.content)?;

    let recipient = public_recipient(store.as_ref(), &username).await?;
    if !recipient.is_accepting_messages {
        return Err(BackendError::forbidden(NOT_ACCEPTING));
    }

    let message = store.insert_message(recipient.id, &request.content).await?;
    tracing::info!(recipient_id = %recipient.id, message_id = %message.id, "Feedback submitted");

    Ok((
        StatusCode::CREATED,
        Json(SubmitFeedbackResponse {
            message: "Feedback submitted successfully".to_string(),
            success: true,
        }),
    ))
}

pub async fn public_profile(
    State(store): State<Arc<dyn Store>>,
    Path(username): Path<String>,
) -> Result<Json<PublicProfileResponse>, BackendError> {
    let user = public_recipient(store.as_ref(), &username).await?;

    Ok(Json(PublicProfileResponse {
        username: user.username,
        is_accepting_messages: user.is_accepting_messages,
    }))
}

pub async fn list_messages(
    State(store): State<Arc<dyn Store>>,
    VerifiedUser(user): VerifiedUser,
) -> Result<Json<Vec<Message>>, BackendError> {
    let messages = store.list_messages(user.id).await?;
    tracing::debug!(user_id = %user.id, "Listed {} messages", messages.len());
    Ok(Json(messages))
}

pub async fn count_messages(
    State(store): State<Arc<dyn Store>>,
    VerifiedUser(user): VerifiedUser,
) -> Result<Json<MessageCountResponse>, BackendError> {
    let count = store.count_messages(user.id).await?;
    Ok(Json(MessageCountResponse { count }))
}

/// Delete message handler
///
/// # Errors
///
/// * `404 Not Found` - message missing or owned by someone else
pub async fn delete_message(
    State(store): State<Arc<dyn Store>>,
    VerifiedUser(user): VerifiedUser,
    Path(message_id): Path<Uuid>,
) -> Result<StatusCode, BackendError> {
    if !store.delete_message(user.id, message_id).await? {
        return Err(BackendError::not_found("Message not found"));
    }

    tracing::info!(user_id = %user.id, message_id = %message_id, "Message deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_messages(
    State(store): State<Arc<dyn Store>>,
    VerifiedUser(user): VerifiedUser,
    ApiJson(request): ApiJson<ToggleMessagesRequest>,
) -> Result<Json<ToggleMessagesResponse>, BackendError> {
    let updated = store
        .set_accepting_messages(user.id, request.is_accepting_messages)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    let message = if updated.is_accepting_messages {
        "You are now accepting feedback"
    } else {
        "You are no longer accepting feedback"
    };
    tracing::info!(
        user_id = %updated.id,
        accepting = updated.is_accepting_messages,
        "Message acceptance changed"
    );

    Ok(Json(ToggleMessagesResponse {
        message: message.to_string(),
        is_accepting_messages: updated.is_accepting_messages,
    }))
}

pub async fn dashboard(
    State(state): State<AppState>,
    VerifiedUser(user): VerifiedUser,
) -> Result<Json<DashboardResponse>, BackendError> {
    let message_count = state.store.count_messages(user.id).await?;

    Ok(Json(DashboardResponse {
        feedback_link: state.settings.links.profile_link(&user.username),
        user: UserResponse::from(&user),
        message_count,
    }))
}
