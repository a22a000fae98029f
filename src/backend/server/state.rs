/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - Loaded settings
 * - The auth flow orchestrator
 * - The token codec used by the bearer extractors
 * - The user and message store
 * - The mail transport
 *
 * Every field is an `Arc`, so cloning the state per request is cheap and
 * there is no per-process mutable state outside the store.
 *
 * # Example
 *
 * ```rust,no_run
 * use anonbox::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let available = state.auth.username_available("alice").await;
 * }
 * ```
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::auth::password::PasswordHasher;
use crate::backend::auth::service::AuthService;
use crate::backend::auth::sessions::TokenCodec;
use crate::backend::email::Mailer;
use crate::backend::server::config::Settings;
use crate::backend::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,

    /// Registration, verification, login and refresh flows
    pub auth: Arc<AuthService>,

    /// Shared with `auth`; extractors parse access tokens through it
    pub tokens: Arc<TokenCodec>,

    pub store: Arc<dyn Store>,

    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Wire the services together from settings and the chosen backends
    pub fn new(settings: Settings, store: Arc<dyn Store>, mailer: Arc<dyn Mailer>) -> Self {
        let tokens = Arc::new(TokenCodec::new(&settings.auth));
        let auth = Arc::new(AuthService::new(
            Arc::clone(&store),
            Arc::clone(&tokens),
            PasswordHasher::new(settings.auth.bcrypt_cost),
            Arc::clone(&mailer),
            settings.links.clone(),
        ));

        Self {
            settings: Arc::new(settings),
            auth,
            tokens,
            store,
            mailer,
        }
    }
}

/// Allows handlers to take `State<Arc<AuthService>>`
impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth.clone()
    }
}

/// Allows handlers to take `State<Arc<dyn Store>>`
impl FromRef<AppState> for Arc<dyn Store> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for Arc<TokenCodec> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}
