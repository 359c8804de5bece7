//! # klink-service
//!
//! Business logic service layer for K-Link. Each service orchestrates
//! repositories, storage, mail, and authentication to implement one group of
//! use cases.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time.

pub mod auth;
pub mod context;
pub mod crud;
pub mod file;
pub mod mail;

pub use auth::AuthService;
pub use context::RequestContext;
pub use crud::{CrudService, UserWriteHook, WriteHook};
pub use file::{FileService, UploadPart};
pub use mail::{LogMailer, SmtpMailer, build_mailer};
