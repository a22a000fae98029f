/**
 * Server Configuration
 *
 * This module loads every setting the server needs from environment
 * variables (after `dotenv` has populated them from `.env`) and validates
 * them once at startup. The resulting `Settings` value is immutable and
 * shared through `AppState`.
 *
 * # Configuration Sources
 *
 * `Settings::from_env` reads the process environment. It delegates to
 * `Settings::from_lookup`, which takes any key lookup function so tests can
 * feed a plain map instead of mutating the environment.
 *
 * # Validation
 *
 * - Both signing keys are required, at least 32 bytes long, and distinct
 * - The signing algorithm must be from the HMAC family
 * - Token lifetimes must be positive integers
 * - The bcrypt cost must lie within bcrypt's accepted range
 */

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Utc};
use jsonwebtoken::Algorithm;
use sqlx::PgPool;
use thiserror::Error;

/// Minimum signing key length in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Configuration loading errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or blank
    #[error("Missing required configuration value: {0}")]
    Missing(&'static str),

    /// A variable is present but unusable
    #[error("Invalid value for {key}: {message}")]
    Invalid {
        key: &'static str,
        message: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            message: message.into(),
        }
    }
}

/// String value that never appears in `Debug` output
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// Full connection URL, either `DATABASE_URL` or assembled from parts
    pub url: Secret,
}

/// Token, hashing and key settings
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Signs verification and access tokens
    pub secret_key: Secret,
    /// Signs refresh tokens
    pub refresh_secret_key: Secret,
    pub algorithm: Algorithm,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub verification_token_ttl: Duration,
    /// Lifetime for password reset tokens; no reset flow issues them yet
    pub password_reset_token_ttl: Duration,
    pub bcrypt_cost: u32,
}

/// Outbound mail settings
#[derive(Debug, Clone)]
pub struct MailSettings {
    /// Resend API key, used as the SMTP password; `None` selects the log mailer
    pub api_key: Option<Secret>,
    /// Sender domain, mail goes out as `noreply@{from_domain}`
    pub from_domain: String,
    pub from_name: String,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl MailSettings {
    pub fn from_address(&self) -> String {
        format!("noreply@{}", self.from_domain)
    }
}

/// Public base URLs used to build links in outgoing mail
#[derive(Debug, Clone)]
pub struct LinkSettings {
    pub frontend_url: String,
    pub backend_url: String,
}

impl LinkSettings {
    /// Link embedded in verification mail
    pub fn verification_link(&self, token: &str) -> String {
        format!("{}/auth/verify-email?token={}", self.backend_url, token)
    }

    /// Public feedback page for a user
    pub fn profile_link(&self, username: &str) -> String {
        format!("{}/u/{}", self.frontend_url, username)
    }
}

/// Listener settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Settings {
    /// `None` when no database variables are set
    pub database: Option<DatabaseSettings>,
    pub auth: AuthSettings,
    pub mail: MailSettings,
    pub links: LinkSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = Self::from_lookup(|key| std::env::var(key).ok())?;

        tracing::info!(
            algorithm = ?settings.auth.algorithm,
            access_ttl_minutes = settings.auth.access_token_ttl.num_minutes(),
            refresh_ttl_days = settings.auth.refresh_token_ttl.num_days(),
            verification_ttl_hours = settings.auth.verification_token_ttl.num_hours(),
            smtp_enabled = settings.mail.api_key.is_some(),
            database_configured = settings.database.is_some(),
            "Configuration loaded"
        );

        Ok(settings)
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Lookup(&lookup);

        let secret_key = env.required("SECRET_KEY")?;
        let refresh_secret_key = env.required("REFRESH_TOKEN_SECRET_KEY")?;
        validate_secret("SECRET_KEY", &secret_key)?;
        validate_secret("REFRESH_TOKEN_SECRET_KEY", &refresh_secret_key)?;
        validate_secrets_are_different(&secret_key, &refresh_secret_key)?;

        let algorithm = parse_algorithm(env.optional("ALGORITHM").as_deref().unwrap_or("HS256"))?;

        let bcrypt_cost = env.parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::invalid("BCRYPT_COST", "must be between 4 and 31"));
        }

        let auth = AuthSettings {
            secret_key: Secret::new(secret_key),
            refresh_secret_key: Secret::new(refresh_secret_key),
            algorithm,
            access_token_ttl: env.ttl("ACCESS_TOKEN_EXPIRE_MINUTES", 30, Duration::try_minutes)?,
            refresh_token_ttl: env.ttl("REFRESH_TOKEN_EXPIRE_DAYS", 7, Duration::try_days)?,
            verification_token_ttl: env.ttl(
                "VERIFICATION_TOKEN_EXPIRE_HOURS",
                24,
                Duration::try_hours,
            )?,
            password_reset_token_ttl: env.ttl(
                "PASSWORD_RESET_TOKEN_EXPIRE_HOURS",
                1,
                Duration::try_hours,
            )?,
            bcrypt_cost,
        };

        let mail = MailSettings {
            api_key: env.optional("RESEND_API_KEY").map(Secret::new),
            from_domain: env.optional("MAIL_FROM").unwrap_or_else(|| "localhost".to_string()),
            from_name: env
                .optional("MAIL_FROM_NAME")
                .unwrap_or_else(|| "Anonymous Feedback".to_string()),
            smtp_host: env
                .optional("SMTP_HOST")
                .unwrap_or_else(|| "smtp.resend.com".to_string()),
            smtp_port: env.parse_or("SMTP_PORT", 587)?,
        };

        let links = LinkSettings {
            frontend_url: trim_base_url(
                env.optional("FRONTEND_URL")
                    .unwrap_or_else(|| "http://localhost:5173".to_string()),
            ),
            backend_url: trim_base_url(
                env.optional("BACKEND_URL")
                    .unwrap_or_else(|| "http://localhost:8000".to_string()),
            ),
        };

        let server = ServerSettings {
            host: env.optional("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env.parse_or("SERVER_PORT", 8000)?,
        };

        Ok(Self {
            database: database_settings(&env)?,
            auth,
            mail,
            links,
            server,
        })
    }
}

struct Lookup<'a, F>(&'a F);

impl<F> Lookup<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key).ok_or(ConfigError::Missing(key))
    }

    fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.optional(key) {
            Some(raw) => raw
                .parse()
                .map_err(|e: T::Err| ConfigError::invalid(key, e.to_string())),
            None => Ok(default),
        }
    }

    fn ttl(
        &self,
        key: &'static str,
        default: i64,
        unit: fn(i64) -> Option<Duration>,
    ) -> Result<Duration, ConfigError> {
        let value: i64 = self.parse_or(key, default)?;
        if value <= 0 {
            return Err(ConfigError::invalid(key, "must be a positive integer"));
        }
        unit(value)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| ConfigError::invalid(key, "value is out of range"))
    }
}

fn database_settings<F>(env: &Lookup<'_, F>) -> Result<Option<DatabaseSettings>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = env.optional("DATABASE_URL") {
        return Ok(Some(DatabaseSettings { url: Secret::new(url) }));
    }

    let Some(host) = env.optional("DATABASE_HOSTNAME") else {
        return Ok(None);
    };
    let port: u16 = env.parse_or("DATABASE_PORT", 5432)?;
    let username = env.required("DATABASE_USERNAME")?;
    let password = env.optional("DATABASE_PASSWORD").unwrap_or_default();
    let name = env.required("DATABASE_NAME")?;

    Ok(Some(DatabaseSettings {
        url: Secret::new(format!(
            "postgres://{username}:{password}@{host}:{port}/{name}"
        )),
    }))
}

fn validate_secret(key: &'static str, secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::invalid(
            key,
            format!("must be at least {MIN_SECRET_LEN} bytes long"),
        ));
    }
    Ok(())
}

fn validate_secrets_are_different(access: &str, refresh: &str) -> Result<(), ConfigError> {
    if access == refresh {
        return Err(ConfigError::invalid(
            "REFRESH_TOKEN_SECRET_KEY",
            "must differ from SECRET_KEY",
        ));
    }
    Ok(())
}

fn parse_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    let algorithm = Algorithm::from_str(&raw.to_ascii_uppercase())
        .map_err(|_| ConfigError::invalid("ALGORITHM", format!("unknown algorithm '{raw}'")))?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        _ => Err(ConfigError::invalid(
            "ALGORITHM",
            "only HS256, HS384 and HS512 are supported with shared secrets",
        )),
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Connect to Postgres and apply pending migrations
pub async fn load_database(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(settings.url.expose()).await?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}
