/**
 * SMTP Mailer
 *
 * Delivers mail through an SMTP relay with STARTTLS. With the default
 * settings this is Resend's relay, which authenticates with the fixed user
 * name `resend` and the API key as password.
 */

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{MailError, Mailer, OutboundEmail};
use crate::backend::server::config::{MailSettings, Secret};

const RELAY_USERNAME: &str = "resend";

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings, api_key: &Secret) -> Result<Self, MailError> {
        let address: Address = settings.from_address().parse()?;
        let from = Mailbox::new(Some(settings.from_name.clone()), address);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)?
            .port(settings.smtp_port)
            .credentials(Credentials::new(
                RELAY_USERNAME.to_string(),
                api_key.expose().to_string(),
            ))
            .build();

        Ok(Self { transport, from })
    }

    fn build_message(&self, email: OutboundEmail) -> Result<Message, MailError> {
        let to: Mailbox = email.to.parse()?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)?;
        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        let recipient = email.to.clone();
        let message = self.build_message(email)?;

        self.transport.send(message).await?;
        tracing::info!(to = %recipient, "Mail delivered to relay");
        Ok(())
    }
}
