//! Outbound Email Module
//!
//! Verification and welcome mail leaves the service through the `Mailer`
//! trait. Three implementations exist:
//!
//! - **`SmtpMailer`** - lettre over STARTTLS to the configured relay (Resend)
//! - **`LogMailer`** - logs that a message was dropped; used when no API key
//!   is configured
//! - **`MemoryMailer`** - records messages and can be told to fail; used by
//!   tests
//!
//! Message bodies are plain text and built in `templates`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::backend::server::config::MailSettings;

pub mod smtp;
pub mod templates;

pub use smtp::SmtpMailer;

/// A fully rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mail delivery failures
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("mail delivery rejected: {0}")]
    Rejected(String),
}

/// Sends rendered messages
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError>;
}

/// Pick the mailer for the configured settings
pub fn build_mailer(settings: &MailSettings) -> Result<Arc<dyn Mailer>, MailError> {
    match &settings.api_key {
        Some(api_key) => {
            tracing::info!(
                host = %settings.smtp_host,
                port = settings.smtp_port,
                "Using SMTP mailer"
            );
            Ok(Arc::new(SmtpMailer::new(settings, api_key)?))
        }
        None => {
            tracing::warn!("RESEND_API_KEY not set. Outgoing mail will be logged and dropped.");
            Ok(Arc::new(LogMailer))
        }
    }
}

/// Drops every message after logging its recipient and subject
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        tracing::info!(to = %email.to, subject = %email.subject, "Mail not sent: no transport configured");
        Ok(())
    }
}

/// Records messages in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail (or succeed again)
    pub fn fail_sends(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Everything delivered so far, oldest first
    pub async fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().await.clone()
    }

    /// Latest message to `to`
    pub async fn last_to(&self, to: &str) -> Option<OutboundEmail> {
        self.sent.lock().await.iter().rev().find(|m| m.to == to).cloned()
    }

    /// Wait until `count` messages to `to` exist, for sends made by
    /// detached tasks. Returns the latest one.
    pub async fn wait_for(&self, to: &str, count: usize, timeout: Duration) -> Option<OutboundEmail> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            {
                let sent = self.sent.lock().await;
                let matching: Vec<&OutboundEmail> = sent.iter().filter(|m| m.to == to).collect();
                if matching.len() >= count {
                    return matching.last().map(|m| (*m).clone());
                }
            }
            if tokio::time::Instant::now() >= deadline {
                return None;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailError::Rejected(format!("delivery to {} disabled", email.to)));
        }
        self.sent.lock().await.push(email);
        Ok(())
    }
}
