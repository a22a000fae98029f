/**
 * Input Validation
 *
 * Field rules applied to registration, login and feedback payloads before
 * any store or hashing work happens.
 *
 * # Rules
 *
 * - Usernames: 3-20 characters, ASCII letters, digits and underscores
 * - Emails: `local@domain.tld`, no whitespace, at most 255 characters
 * - Passwords: at least 6 characters and at most 72 bytes (bcrypt input limit)
 * - Feedback content: 1-1000 characters
 */

use crate::shared::error::SharedError;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;
pub const EMAIL_MAX_LEN: usize = 255;
pub const PASSWORD_MIN_LEN: usize = 6;
/// bcrypt ignores everything past this many bytes
pub const PASSWORD_MAX_BYTES: usize = 72;
pub const MESSAGE_MAX_LEN: usize = 1000;

/// Check whether a username has the allowed shape
pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len)
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Structural email check
///
/// One `@`, a non-empty local part, and a
/// dotted domain whose labels are non-empty. Deliverability is proven by
/// the verification mail, not by this function.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > EMAIL_MAX_LEN {
        return false;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

pub fn validate_username(username: &str) -> Result<(), SharedError> {
    if is_valid_username(username) {
        Ok(())
    } else {
        Err(SharedError::validation(
            "username",
            "Username must be 3-20 characters and contain only letters, numbers, and underscores",
        ))
    }
}

pub fn validate_email(email: &str) -> Result<(), SharedError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(SharedError::validation("email", "Invalid email format"))
    }
}

pub fn validate_password(password: &str) -> Result<(), SharedError> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(SharedError::validation(
            "password",
            "Password must be at least 6 characters",
        ));
    }
    if password.len() > PASSWORD_MAX_BYTES {
        return Err(SharedError::validation(
            "password",
            "Password must be at most 72 bytes",
        ));
    }
    Ok(())
}

/// Validate anonymous feedback content
pub fn validate_message_content(content: &str) -> Result<(), SharedError> {
    let len = content.chars().count();
    if len == 0 {
        return Err(SharedError::validation("content", "Message cannot be empty"));
    }
    if len > MESSAGE_MAX_LEN {
        return Err(SharedError::validation(
            "content",
            "Message must be at most 1000 characters",
        ));
    }
    Ok(())
}
