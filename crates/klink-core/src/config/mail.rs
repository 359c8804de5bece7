//! Outgoing mail (SMTP) configuration.

use serde::{Deserialize, Serialize};

/// Transport security for the SMTP connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailTls {
    /// Plain connection.
    None,
    /// Upgrade with STARTTLS when offered.
    #[default]
    Starttls,
    /// Implicit TLS (SMTPS).
    Tls,
}

/// SMTP settings. When `enabled` is false, messages are only logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Send real mail.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP host.
    #[serde(default = "default_host")]
    pub host: String,
    /// SMTP port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// SMTP username.
    #[serde(default)]
    pub username: String,
    /// SMTP password.
    #[serde(default)]
    pub password: String,
    /// Transport security.
    #[serde(default)]
    pub tls: MailTls,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Sender address.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Send timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_host(),
            port: default_port(),
            username: String::new(),
            password: String::new(),
            tls: MailTls::default(),
            from_name: default_from_name(),
            from_address: default_from_address(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "K-LINK".to_string()
}

fn default_from_address() -> String {
    "no-reply@k-link.local".to_string()
}

fn default_timeout() -> u64 {
    30
}
