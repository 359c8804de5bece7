//! Password hashing, policy enforcement, and reset tokens.

pub mod hasher;
pub mod reset;
pub mod validator;

pub use hasher::PasswordHasher;
pub use reset::ResetToken;
pub use validator::PasswordValidator;
