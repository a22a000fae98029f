//! Request and response types for the feedback endpoints

use serde::{Deserialize, Serialize};

use crate::backend::auth::handlers::types::UserResponse;

/// Anonymous message body, 1-1000 characters
#[derive(Deserialize, Serialize, Debug)]
pub struct SubmitFeedbackRequest {
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SubmitFeedbackResponse {
    pub message: String,
    pub success: bool,
}

/// What anyone can see about a recipient
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct PublicProfileResponse {
    pub username: String,
    pub is_accepting_messages: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MessageCountResponse {
    pub count: i64,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ToggleMessagesRequest {
    pub is_accepting_messages: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ToggleMessagesResponse {
    pub message: String,
    pub is_accepting_messages: bool,
}

/// Owner view: profile, inbox size and the link to share
#[derive(Serialize, Deserialize, Debug)]
pub struct DashboardResponse {
    pub user: UserResponse,
    pub message_count: i64,
    pub feedback_link: String,
}
