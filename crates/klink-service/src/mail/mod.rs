//! Outgoing mail: SMTP delivery and a log-only fallback.

pub mod log;
pub mod smtp;

use std::sync::Arc;

use klink_core::config::MailConfig;
use klink_core::result::AppResult;
use klink_core::traits::Mailer;

pub use log::LogMailer;
pub use smtp::SmtpMailer;

/// SMTP when `mail.enabled`, otherwise a mailer that only logs.
pub fn build_mailer(config: &MailConfig) -> AppResult<Arc<dyn Mailer>> {
    if config.enabled {
        Ok(Arc::new(SmtpMailer::new(config)?))
    } else {
        Ok(Arc::new(LogMailer))
    }
}
