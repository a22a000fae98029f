//! Plain-text bodies for account mail

use super::OutboundEmail;

pub const VERIFICATION_SUBJECT: &str = "Verify your email address - Anonymous Feedback";
pub const WELCOME_SUBJECT: &str = "Welcome to Anonymous Feedback!";

/// Mail carrying the verification link for a new or re-requested token
pub fn verification_email(
    to: &str,
    username: &str,
    verification_link: &str,
    expires_in_hours: i64,
) -> OutboundEmail {
    let body = format!(
        "Hi {username},\n\
         \n\
         Thanks for signing up for Anonymous Feedback. Confirm your email address by opening the link below:\n\
         \n\
         {verification_link}\n\
         \n\
         The link expires in {expires_in_hours} hours. If you did not create an account, you can ignore this message.\n"
    );

    OutboundEmail {
        to: to.to_string(),
        subject: VERIFICATION_SUBJECT.to_string(),
        body,
    }
}

/// Mail sent once the address is confirmed
pub fn welcome_email(to: &str, username: &str, profile_link: &str) -> OutboundEmail {
    let body = format!(
        "Hi {username},\n\
         \n\
         Your email is verified and your account is ready. Share your feedback link to start receiving anonymous messages:\n\
         \n\
         {profile_link}\n"
    );

    OutboundEmail {
        to: to.to_string(),
        subject: WELCOME_SUBJECT.to_string(),
        body,
    }
}
