//! Core traits defined in `klink-core` and implemented by other crates.

pub mod mail;
pub mod storage;

pub use mail::{MailMessage, Mailer};
pub use storage::{ByteStream, StorageProvider};
