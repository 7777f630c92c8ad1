//! Emailer: finds a candidate's address in CV text and mails them over
//! an authenticated session (STARTTLS unless configured otherwise).

use std::sync::LazyLock;
use std::time::Duration;

use lettre::address::AddressError;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{SmtpConfig, SmtpTls};

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

type Transport = AsyncSmtpTransport<Tokio1Executor>;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP is not configured")]
    NotConfigured,

    #[error("invalid address: {0}")]
    Address(#[from] AddressError),

    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("{0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Result of a send. Failures are reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum EmailOutcome {
    Sent,
    Failed(String),
}

impl EmailOutcome {
    pub fn message(&self) -> String {
        match self {
            EmailOutcome::Sent => "Email sent successfully!".to_string(),
            EmailOutcome::Failed(e) => format!("Failed to send email: {e}"),
        }
    }
}

/// First email-shaped substring of `text`. Shape only, no validation.
pub fn extract_email(text: &str) -> Option<&str> {
    static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+").expect("valid regex")
    });
    EMAIL_RE.find(text).map(|m| m.as_str())
}

#[derive(Debug, Clone)]
pub struct Mailer {
    smtp: Option<SmtpConfig>,
}

impl Mailer {
    pub fn new(smtp: Option<SmtpConfig>) -> Self {
        Self { smtp }
    }

    /// One connection per message. The sender is the SMTP user.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> EmailOutcome {
        match self.try_send(to, subject, body).await {
            Ok(()) => {
                info!("Email sent to {to}");
                EmailOutcome::Sent
            }
            Err(e) => {
                warn!("Failed to send email to {to}: {e}");
                EmailOutcome::Failed(e.to_string())
            }
        }
    }

    async fn try_send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let smtp = self.smtp.as_ref().ok_or(MailError::NotConfigured)?;

        let message = Message::builder()
            .from(smtp.user.parse::<Mailbox>()?)
            .to(to.parse::<Mailbox>()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        let builder = match smtp.tls {
            SmtpTls::StartTls => Transport::starttls_relay(&smtp.host)?,
            SmtpTls::Implicit => Transport::relay(&smtp.host)?,
            SmtpTls::None => Transport::builder_dangerous(&smtp.host),
        };
        let transport = builder
            .port(smtp.port)
            .credentials(Credentials::new(smtp.user.clone(), smtp.password.clone()))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        transport.send(message).await?;
        Ok(())
    }
}
