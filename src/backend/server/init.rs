/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including store selection, mailer selection and route configuration.
 *
 * # Initialization Process
 *
 * 1. Connect to Postgres and run migrations, or fall back to the in-memory
 *    store when no database is configured
 * 2. Build the mailer (SMTP when an API key is set, logging otherwise)
 * 3. Assemble `AppState`
 * 4. Create and configure the router
 */

use axum::Router;
use std::sync::Arc;
use thiserror::Error;

use crate::backend::email::{build_mailer, MailError, Mailer};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, Settings};
use crate::backend::server::state::AppState;
use crate::backend::store::{MemoryStore, PgStore, Store};

/// Startup failures
#[derive(Debug, Error)]
pub enum InitError {
    #[error("database initialization failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("mailer initialization failed: {0}")]
    Mail(#[from] MailError),
}

/// Create and configure the Axum application
///
/// # Error Handling
///
/// - Missing database configuration: the server runs on the in-memory store
///   and logs a warning; data is lost on restart
/// - Unreachable database or failed migration: startup fails
/// - Invalid mail sender address: startup fails
pub async fn create_app(settings: Settings) -> Result<Router<()>, InitError> {
    tracing::info!("Initializing anonymous feedback backend");

    let store: Arc<dyn Store> = match &settings.database {
        Some(database) => Arc::new(PgStore::new(load_database(database).await?)),
        None => {
            tracing::warn!("Database not configured. Using in-memory store.");
            Arc::new(MemoryStore::new())
        }
    };

    let mailer = build_mailer(&settings.mail)?;

    Ok(build_app(settings, store, mailer))
}

/// Assemble the router over explicit backends
pub fn build_app(settings: Settings, store: Arc<dyn Store>, mailer: Arc<dyn Mailer>) -> Router<()> {
    let app_state = AppState::new(settings, store, mailer);
    let app = create_router(app_state);
    tracing::info!("Router configured");
    app
}
