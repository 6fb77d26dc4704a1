//! Outbound email
//!
//! SMTP relay for the contact form and newsletter subscription
//! confirmations. Mail sending is optional: when SMTP is not configured
//! the contact form returns an error, while subscription confirmations
//! are skipped silently (a subscription must never fail because of mail).

use anyhow::{anyhow, Result};
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;

/// A validated contact-form submission
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// SMTP mailer
pub struct Mailer {
    config: SmtpConfig,
}

impl Mailer {
    /// Create a new mailer from SMTP configuration
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Whether outbound mail is configured
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Relay a contact-form submission to the configured inbox.
    ///
    /// The reply-to header carries the visitor's address so staff can
    /// answer directly.
    pub async fn send_contact_message(&self, contact: &ContactMessage) -> Result<()> {
        if !self.is_configured() {
            return Err(anyhow!("SMTP is not configured"));
        }

        let to = if self.config.contact_to.is_empty() {
            &self.config.from
        } else {
            &self.config.contact_to
        };

        let body = format!(
            "New contact form submission\n\n\
             From: {} {} {} <{}>\n\
             Subject: {}\n\n\
             {}\n",
            contact.title,
            contact.first_name,
            contact.last_name,
            contact.email,
            contact.subject,
            contact.message,
        );

        let email = Message::builder()
            .from(
                self.config
                    .from
                    .parse()
                    .map_err(|e| anyhow!("Invalid from address: {}", e))?,
            )
            .to(to.parse().map_err(|e| anyhow!("Invalid to address: {}", e))?)
            .reply_to(
                contact
                    .email
                    .parse()
                    .map_err(|e| anyhow!("Invalid reply-to address: {}", e))?,
            )
            .subject(format!(
                "New contact form submission from {} {}",
                contact.first_name, contact.last_name
            ))
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| anyhow!("Failed to build email: {}", e))?;

        self.send(email).await
    }

    /// Send a bilingual subscription confirmation to a new subscriber.
    pub async fn send_subscribe_confirmation(&self, to_email: &str) -> Result<()> {
        if !self.is_configured() {
            return Err(anyhow!("SMTP is not configured"));
        }

        let body = "Thank you for subscribing to our newsletter. You will now receive \
                    our latest news and publications.\n\n\
                    Merci de vous être abonné à notre lettre d'information. Vous recevrez \
                    désormais nos dernières actualités et publications.\n"
            .to_string();

        let email = Message::builder()
            .from(
                self.config
                    .from
                    .parse()
                    .map_err(|e| anyhow!("Invalid from address: {}", e))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| anyhow!("Invalid to address: {}", e))?)
            .subject("Subscription confirmed / Abonnement confirmé")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| anyhow!("Failed to build email: {}", e))?;

        self.send(email).await
    }

    async fn send(&self, email: Message) -> Result<()> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)
            .map_err(|e| anyhow!("Failed to create SMTP transport: {}", e))?
            .port(self.config.port);

        if !self.config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ));
        }

        let mailer = builder.build();

        mailer
            .send(email)
            .await
            .map_err(|e| anyhow!("Failed to send email: {}", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_contact() -> ContactMessage {
        ContactMessage {
            title: "Mr".to_string(),
            first_name: "Jean".to_string(),
            last_name: "Mbarga".to_string(),
            email: "jean@example.com".to_string(),
            subject: "Partnership inquiry".to_string(),
            message: "I would like to discuss a partnership.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_mailer_rejects_contact() {
        let mailer = Mailer::new(SmtpConfig::default());
        assert!(!mailer.is_configured());

        let result = mailer.send_contact_message(&make_contact()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unconfigured_mailer_rejects_confirmation() {
        let mailer = Mailer::new(SmtpConfig::default());
        let result = mailer.send_subscribe_confirmation("reader@example.com").await;
        assert!(result.is_err());
    }
}
