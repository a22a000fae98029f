//! Custom assertion macros and utilities
//!
//! Provides assertion macros for the JSON error body every failing endpoint
//! returns.

/// Assert an error response's status and `error` message
///
/// Also checks that the body's `status` field agrees with the HTTP status.
#[macro_export]
macro_rules! assert_api_error {
    ($response:expr, $status:expr) => {{
        let response = &$response;
        assert_eq!(response.status_code(), $status);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], $status.as_u16());
        body
    }};
    ($response:expr, $status:expr, $message:expr) => {{
        let body = $crate::assert_api_error!($response, $status);
        assert_eq!(body["error"], $message);
        body
    }};
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}
