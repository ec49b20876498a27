//! SMTP transport behind a trait seam.
//!
//! Every relay request builds a fresh transport from the current settings
//! and verifies the connection before anything is composed or sent. The
//! [`TransportFactory`] indirection lets request handlers run against a
//! recording double in tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use sitequote_core::{ConfigError, SmtpSettings};

const SMTP_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum MailError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("could not build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("could not create SMTP transport: {0}")]
    Transport(String),
    #[error("SMTP connection verification failed: {0}")]
    Verify(String),
    #[error("SMTP send failed: {0}")]
    Send(String),
}

/// A single outbound message, addressed and ready to send. `html` is an
/// alternative part next to the plain text when present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmailEnvelope {
    pub from: String,
    pub to: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SendReceipt {
    pub message_id: String,
    pub response: String,
    pub envelope: EmailEnvelope,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn verify(&self) -> Result<(), MailError>;
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailError>;
}

/// Builds a transport from resolved settings. Production uses
/// [`SmtpTransportFactory`]; tests substitute doubles that record calls.
pub trait TransportFactory: Send + Sync {
    fn create(&self, settings: &SmtpSettings) -> Result<Arc<dyn MailTransport>, MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// The secure flag selects implicit TLS; otherwise the session upgrades
    /// via STARTTLS, matching the deployment's convention.
    pub fn connect(settings: &SmtpSettings) -> Result<Self, MailError> {
        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|error| MailError::Transport(error.to_string()))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.expose_secret().to_owned(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        let from = settings.from_address.parse::<Mailbox>()?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn verify(&self) -> Result<(), MailError> {
        let reachable = self
            .transport
            .test_connection()
            .await
            .map_err(|error| MailError::Verify(error.to_string()))?;
        if !reachable {
            return Err(MailError::Verify("connection test failed".to_string()));
        }
        Ok(())
    }

    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailError> {
        let message_id = format!("<{}@sitequote>", Uuid::new_v4());

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse::<Mailbox>()?)
            .subject(&email.subject)
            .message_id(Some(message_id.clone()));
        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(reply_to.parse::<Mailbox>()?);
        }

        let message = match &email.html {
            Some(html) => builder
                .multipart(MultiPart::alternative_plain_html(email.text.clone(), html.clone()))?,
            None => builder.body(email.text.clone())?,
        };

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|error| MailError::Send(error.to_string()))?;

        Ok(SendReceipt {
            message_id,
            response: format!(
                "{} {}",
                response.code(),
                response.message().collect::<Vec<_>>().join(" ")
            ),
            envelope: EmailEnvelope {
                from: self.from.email.to_string(),
                to: vec![email.to.clone()],
            },
        })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SmtpTransportFactory;

impl TransportFactory for SmtpTransportFactory {
    fn create(&self, settings: &SmtpSettings) -> Result<Arc<dyn MailTransport>, MailError> {
        Ok(Arc::new(SmtpMailer::connect(settings)?))
    }
}
