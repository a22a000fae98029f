//! In-memory application fixture
//!
//! Builds the full router over `MemoryStore` and `MemoryMailer`, so the
//! whole HTTP surface runs without Postgres or an SMTP relay.

use axum_test::TestServer;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anonbox::backend::email::{MemoryMailer, OutboundEmail};
use anonbox::backend::server::{build_app, Settings};
use anonbox::backend::store::MemoryStore;

pub const FRONTEND_URL: &str = "http://app.test";
pub const BACKEND_URL: &str = "http://api.test";

/// How long to wait for mail sent from detached tasks
pub const MAIL_TIMEOUT: Duration = Duration::from_secs(2);

/// Environment used by every test app; bcrypt runs at its minimum cost
pub fn test_env() -> HashMap<&'static str, String> {
    HashMap::from([
        ("SECRET_KEY", "integration-primary-signing-key-0123456789".to_string()),
        (
            "REFRESH_TOKEN_SECRET_KEY",
            "integration-refresh-signing-key-0123456789".to_string(),
        ),
        ("BCRYPT_COST", "4".to_string()),
        ("FRONTEND_URL", FRONTEND_URL.to_string()),
        ("BACKEND_URL", BACKEND_URL.to_string()),
    ])
}

pub fn test_settings(overrides: &[(&'static str, &str)]) -> Settings {
    let mut vars = test_env();
    for (key, value) in overrides {
        vars.insert(*key, value.to_string());
    }
    Settings::from_lookup(|key| vars.get(key).cloned()).expect("valid test settings")
}

pub struct TestApp {
    pub server: TestServer,
    pub store: MemoryStore,
    pub mailer: MemoryMailer,
    pub settings: Settings,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_overrides(&[])
    }

    pub fn with_overrides(overrides: &[(&'static str, &str)]) -> Self {
        let settings = test_settings(overrides);
        let store = MemoryStore::new();
        let mailer = MemoryMailer::new();

        let app = build_app(
            settings.clone(),
            Arc::new(store.clone()),
            Arc::new(mailer.clone()),
        );
        let server = TestServer::new(app).expect("test server");

        Self {
            server,
            store,
            mailer,
            settings,
        }
    }

    /// The `count`-th message sent to `to`
    pub async fn mail_to(&self, to: &str, count: usize) -> OutboundEmail {
        self.mailer
            .wait_for(to, count, MAIL_TIMEOUT)
            .await
            .unwrap_or_else(|| panic!("expected {} message(s) to {}", count, to))
    }
}
