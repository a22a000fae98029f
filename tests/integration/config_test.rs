//! Environment configuration tests
//!
//! These mutate process environment variables, so they run serially.

use serial_test::serial;

use anonbox::backend::server::config::{ConfigError, Settings};

const KEYS: &[&str] = &[
    "SECRET_KEY",
    "REFRESH_TOKEN_SECRET_KEY",
    "ALGORITHM",
    "ACCESS_TOKEN_EXPIRE_MINUTES",
    "REFRESH_TOKEN_EXPIRE_DAYS",
    "BCRYPT_COST",
    "DATABASE_URL",
    "DATABASE_HOSTNAME",
    "RESEND_API_KEY",
    "FRONTEND_URL",
];

fn clear_env() {
    for key in KEYS {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_from_env_requires_signing_keys() {
    clear_env();

    let result = Settings::from_env();
    assert!(matches!(result, Err(ConfigError::Missing("SECRET_KEY"))));
}

#[test]
#[serial]
fn test_from_env_reads_process_environment() {
    clear_env();
    std::env::set_var("SECRET_KEY", "env-primary-signing-key-0123456789abcd");
    std::env::set_var("REFRESH_TOKEN_SECRET_KEY", "env-refresh-signing-key-0123456789abcd");
    std::env::set_var("ACCESS_TOKEN_EXPIRE_MINUTES", "15");
    std::env::set_var("FRONTEND_URL", "https://feedback.example/");

    let settings = Settings::from_env().expect("settings");
    clear_env();

    assert_eq!(settings.auth.access_token_ttl.num_minutes(), 15);
    assert_eq!(settings.auth.refresh_token_ttl.num_days(), 7);
    assert_eq!(settings.links.profile_link("alice"), "https://feedback.example/u/alice");
    assert!(settings.database.is_none());
    assert!(settings.mail.api_key.is_none());
}

#[test]
#[serial]
fn test_from_env_rejects_identical_keys() {
    clear_env();
    std::env::set_var("SECRET_KEY", "same-signing-key-for-both-0123456789ab");
    std::env::set_var("REFRESH_TOKEN_SECRET_KEY", "same-signing-key-for-both-0123456789ab");

    let result = Settings::from_env();
    clear_env();

    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
}
