// src/services/sender.rs

//! Outreach mail delivery over an authenticated SMTP relay.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::{
    Config, OutreachConfig, OutreachMessage, SmtpConfig, TemplateContext, render_message,
};

/// Delivers one outreach message.
#[async_trait]
pub trait OutreachSender: Send + Sync {
    /// Render and send the outreach message to `to_address`.
    async fn send_email(&self, to_address: &str, recipient_name: &str) -> Result<()>;
}

/// Sender that opens a STARTTLS session per message.
pub struct SmtpSender {
    smtp: SmtpConfig,
    outreach: OutreachConfig,
}

impl SmtpSender {
    pub fn new(config: &Config) -> Self {
        Self {
            smtp: config.smtp.clone(),
            outreach: config.outreach.clone(),
        }
    }

    /// Render the message for a recipient without sending it.
    pub fn compose(&self, to_address: &str, recipient_name: &str) -> OutreachMessage {
        let ctx = TemplateContext {
            name: recipient_name,
            scheduling_link: &self.outreach.scheduling_link,
        };
        render_message(&self.outreach, &ctx, to_address)
    }

    /// Turn a rendered message into a MIME mail.
    pub fn build_email(&self, message: &OutreachMessage, recipient_name: &str) -> Result<Message> {
        let from: Mailbox = self
            .smtp
            .sender()
            .parse()
            .map_err(|e| AppError::delivery(format!("invalid sender address: {e}")))?;
        let address: Address = message
            .recipient
            .parse()
            .map_err(|e| AppError::delivery(format!("invalid recipient {}: {e}", message.recipient)))?;
        let to = Mailbox::new(Some(recipient_name.to_string()), address);

        Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(AppError::delivery)
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let credentials = Credentials::new(self.smtp.username.clone(), self.smtp.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.smtp.host)
            .map_err(AppError::delivery)?
            .port(self.smtp.port)
            .credentials(credentials)
            .build();
        Ok(transport)
    }
}

#[async_trait]
impl OutreachSender for SmtpSender {
    async fn send_email(&self, to_address: &str, recipient_name: &str) -> Result<()> {
        let message = self.compose(to_address, recipient_name);
        let email = self.build_email(&message, recipient_name)?;

        // Dropped at the end of this call, which closes the session.
        let transport = self.transport()?;
        let response = transport.send(email).await.map_err(AppError::delivery)?;
        log::debug!(
            "Relay accepted mail for {}: {}",
            to_address,
            response.code()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> SmtpSender {
        let mut config = Config::default();
        config.smtp.username = "bot@example.com".to_string();
        config.outreach.scheduling_link = "https://cal.example/me".to_string();
        SmtpSender::new(&config)
    }

    #[test]
    fn test_compose_renders_template() {
        let msg = sender().compose("alice@example.com", "Alice");
        assert_eq!(msg.recipient, "alice@example.com");
        assert!(msg.body.starts_with("Hi Alice,"));
        assert!(msg.body.contains("https://cal.example/me"));
    }

    #[test]
    fn test_build_email_headers() {
        let sender = sender();
        let msg = sender.compose("alice@example.com", "Alice");
        let email = sender.build_email(&msg, "Alice").unwrap();

        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("From: bot@example.com"));
        assert!(raw.contains("alice@example.com"));
        assert!(raw.contains("Subject: Free 30-Min AI Consultation & Workflow Audit"));
    }

    #[test]
    fn test_build_email_rejects_bad_recipient() {
        let sender = sender();
        let msg = sender.compose("not-an-address", "Bob");
        let err = sender.build_email(&msg, "Bob").unwrap_err();
        assert!(matches!(err, AppError::Delivery(_)));
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_delivery_error() {
        let mut config = Config::default();
        config.smtp.host = "127.0.0.1".to_string();
        config.smtp.port = 9;
        config.smtp.username = "bot@example.com".to_string();
        config.smtp.password = "secret".to_string();

        let err = SmtpSender::new(&config)
            .send_email("alice@example.com", "Alice")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Delivery(_)));
    }

    #[tokio::test]
    async fn test_send_with_bad_recipient_is_delivery_error() {
        let err = sender().send_email("nope", "Bob").await.unwrap_err();
        assert!(matches!(err, AppError::Delivery(_)));
    }
}
