use anyhow::Result;
use lettre::message::Mailbox;

use crate::infra::mail::Mailer;

#[derive(Clone)]
pub struct ContactService {
    mailer: Mailer,
}

impl ContactService {
    pub fn new(mailer: Mailer) -> Self {
        Self { mailer }
    }

    /// Forward a contact-form submission to the site owner. The visitor's
    /// address goes into Reply-To so the owner can answer directly.
    pub async fn send_feedback(
        &self,
        name: &str,
        reply_to: Mailbox,
        subject: &str,
        message: String,
    ) -> Result<()> {
        let subject = format!("From {} | {}", name, subject);
        self.mailer.send_contact(reply_to, &subject, message).await
    }
}

/// CR/LF in a header-bound field would let a visitor inject mail headers.
pub fn contains_header_break(value: &str) -> bool {
    value.chars().any(|ch| ch == '\r' || ch == '\n')
}
