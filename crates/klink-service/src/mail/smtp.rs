//! SMTP mailer using lettre's async transport.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, Message, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{debug, info, warn};

use klink_core::config::{MailConfig, MailTls};
use klink_core::error::{AppError, ErrorKind};
use klink_core::result::AppResult;
use klink_core::traits::{MailMessage, Mailer};

/// Sends mail through the configured SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Build the transport from configuration. No connection is opened yet.
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        let tls = match config.tls {
            MailTls::None => Tls::None,
            MailTls::Starttls => Tls::Opportunistic(tls_parameters(&config.host)?),
            MailTls::Tls => Tls::Wrapper(tls_parameters(&config.host)?),
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_seconds)))
            .tls(tls);
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse::<Mailbox>()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Invalid mail.from_address", e)
            })?;

        debug!(host = %config.host, port = config.port, tls = ?config.tls, "SMTP mailer configured");

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

fn tls_parameters(host: &str) -> AppResult<TlsParameters> {
    TlsParameters::builder(host.to_string())
        .build()
        .map_err(|e| AppError::with_source(ErrorKind::Configuration, "TLS configuration error", e))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: MailMessage) -> AppResult<()> {
        let to = match &message.to_name {
            Some(name) => format!("{name} <{}>", message.to),
            None => message.to.clone(),
        };
        let to = to
            .parse::<Mailbox>()
            .map_err(|e| AppError::with_source(ErrorKind::Validation, "Invalid recipient", e))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&message.subject)
            .singlepart(SinglePart::plain(message.body))
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to build email", e))?;

        match self.transport.send(email).await {
            Ok(_) => {
                info!(to = %message.to, subject = %message.subject, "Email sent");
                Ok(())
            }
            Err(e) => {
                warn!(to = %message.to, error = %e, "Failed to send email");
                Err(AppError::with_source(
                    ErrorKind::ExternalService,
                    "SMTP send failed",
                    e,
                ))
            }
        }
    }
}
