//! Mailer that writes messages to the log instead of sending them.

use async_trait::async_trait;
use tracing::info;

use klink_core::result::AppResult;
use klink_core::traits::{MailMessage, Mailer};

/// Logs every message at info level. Used when SMTP is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: MailMessage) -> AppResult<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "Mail delivery disabled, logging message"
        );
        Ok(())
    }
}
