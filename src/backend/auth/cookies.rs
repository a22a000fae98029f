/**
 * Refresh Token Cookie
 *
 * The refresh token travels in an `HttpOnly; Secure; SameSite=Lax` cookie so
 * page scripts never see it. Login and refresh overwrite it, logout expires
 * it.
 */

use axum::http::{header::COOKIE, header::InvalidHeaderValue, HeaderMap, HeaderValue};
use chrono::Duration;

pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

/// Build the `Set-Cookie` value carrying a refresh token
pub fn refresh_cookie(token: &str, max_age: Duration) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age_seconds = max_age.num_seconds().max(0);
    HeaderValue::from_str(&format!(
        "{REFRESH_COOKIE_NAME}={token}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={max_age_seconds}"
    ))
}

/// `Set-Cookie` value that expires the refresh cookie immediately
pub fn clear_refresh_cookie() -> HeaderValue {
    HeaderValue::from_static("refresh_token=; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age=0")
}

/// Read the refresh token from any `Cookie` header on the request
pub fn extract_refresh_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == REFRESH_COOKIE_NAME).then(|| val.trim().to_string())
        })
        .find(|token| !token.is_empty())
}
