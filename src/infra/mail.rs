use anyhow::{anyhow, Result};
use lettre::message::Mailbox;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::AppConfig;

/// Outgoing mail for the contact form. When SMTP_URL is unset the message
/// is logged and dropped, so dev and test environments need no mail server.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
    recipient: Mailbox,
}

impl Mailer {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let from: Mailbox = config
            .contact_from
            .parse()
            .map_err(|err| anyhow!("invalid CONTACT_FROM: {}", err))?;
        let recipient: Mailbox = config
            .contact_recipient
            .parse()
            .map_err(|err| anyhow!("invalid CONTACT_RECIPIENT: {}", err))?;
        let transport = match &config.smtp_url {
            Some(url) => Some(AsyncSmtpTransport::<Tokio1Executor>::from_url(url)?.build()),
            None => None,
        };

        Ok(Self {
            transport,
            from,
            recipient,
        })
    }

    pub async fn send_contact(
        &self,
        reply_to: Mailbox,
        subject: &str,
        body: String,
    ) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.recipient.clone())
            .reply_to(reply_to)
            .subject(subject)
            .body(body)?;

        match &self.transport {
            Some(transport) => {
                transport.send(message).await?;
            }
            None => {
                tracing::info!(subject, "SMTP not configured, dropping contact message");
            }
        }

        Ok(())
    }
}
