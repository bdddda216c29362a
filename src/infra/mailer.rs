//! Outbound e-mail.
//!
//! SMTP through lettre when `SMTP_HOST` is configured, otherwise messages
//! are written to the log.

use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials as SmtpCredentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpSettings;
use crate::errors::{AppError, AppResult};

/// A rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl Email {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html: html.into(),
        }
    }
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: Email) -> AppResult<()>;
}

/// SMTP relay sender.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> AppResult<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| AppError::internal(format!("SMTP relay setup failed: {}", e)))?
            .port(settings.port);

        if let (Some(user), Some(pass)) = (settings.username.clone(), settings.password()) {
            builder = builder.credentials(SmtpCredentials::new(user, pass.to_string()));
        }

        Ok(Self {
            transport: builder.build(),
            from: settings.from.clone(),
        })
    }
}

#[async_trait]
impl EmailSender for SmtpMailer {
    async fn send(&self, email: Email) -> AppResult<()> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| AppError::internal(format!("Bad sender address: {}", e)))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|e| AppError::internal(format!("Bad recipient address: {}", e)))?)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html)
            .map_err(|e| AppError::internal(format!("Message build failed: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::internal(format!("SMTP send failed: {}", e)))?;
        Ok(())
    }
}

/// Development sender that only logs.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl EmailSender for LogMailer {
    async fn send(&self, email: Email) -> AppResult<()> {
        tracing::warn!("SMTP not configured - logging email instead of sending");
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            body_len = email.html.len(),
            "email (not sent)"
        );
        Ok(())
    }
}

/// Pick the sender for the given settings.
pub fn mailer_from_settings(smtp: Option<&SmtpSettings>) -> AppResult<std::sync::Arc<dyn EmailSender>> {
    match smtp {
        Some(settings) => {
            tracing::info!(host = %settings.host, port = settings.port, "SMTP mailer configured");
            Ok(std::sync::Arc::new(SmtpMailer::new(settings)?))
        }
        None => Ok(std::sync::Arc::new(LogMailer)),
    }
}
