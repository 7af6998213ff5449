//! Outbound mail delivery.
//!
//! Password-reset links go out through the [`Mailer`] port. Production uses
//! [`SmtpMailer`] (lettre, STARTTLS); when no mail server is configured the
//! [`NoopMailer`] logs the link instead so the reset flow stays usable in
//! development.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::debug;

/// Mail delivery errors.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mail address: {0}")]
    Address(String),

    #[error("message build failed: {0}")]
    Message(String),

    #[error("smtp transport error: {0}")]
    Smtp(String),
}

/// SMTP settings for outbound mail.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub server: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender address for outgoing messages.
    pub from: String,
}

/// Outbound mail port.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_password_reset(&self, to: &str, reset_url: &str) -> Result<(), MailError>;
}

/// Lettre-backed SMTP mailer. The transport is built once at startup and
/// reused for every message.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
            .map_err(|e| MailError::Smtp(e.to_string()))?
            .port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }
        let from = config
            .from
            .parse()
            .map_err(|_| MailError::Address(config.from.clone()))?;
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_text_body(reset_url: &str) -> String {
        format!(
            "Hello,\n\n\
             You requested a password reset. Follow the link below to choose a new password:\n\n\
             {reset_url}\n\n\
             The link expires in one hour. If you did not request this, you can ignore this email.\n"
        )
    }

    fn build_html_body(reset_url: &str) -> String {
        format!(
            r#"<html>
  <body>
    <h2>Password reset</h2>
    <p>Hello,</p>
    <p>You requested a password reset. Follow the link below to choose a new password:</p>
    <p><a href="{reset_url}">Reset my password</a></p>
    <p>Or copy and paste this link into your browser:</p>
    <p>{reset_url}</p>
    <p>The link expires in one hour. If you did not request this, you can ignore this email.</p>
  </body>
</html>"#
        )
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_password_reset(&self, to: &str, reset_url: &str) -> Result<(), MailError> {
        let to: Mailbox = to.parse().map_err(|_| MailError::Address(to.into()))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("Password reset")
            .multipart(MultiPart::alternative_plain_html(
                Self::build_text_body(reset_url),
                Self::build_html_body(reset_url),
            ))
            .map_err(|e| MailError::Message(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;
        Ok(())
    }
}

/// Mailer that logs instead of sending.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send_password_reset(&self, to: &str, reset_url: &str) -> Result<(), MailError> {
        debug!(to, reset_url, "mail delivery disabled, dropping password reset email");
        Ok(())
    }
}
