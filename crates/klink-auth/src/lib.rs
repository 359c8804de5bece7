//! # klink-auth
//!
//! Authentication and authorization building blocks for the K-Link API.
//!
//! ## Modules
//!
//! - `jwt`: token signing and verification
//! - `password`: Argon2id hashing, password policy and reset tokens
//! - `rbac`: role permission checks

pub mod jwt;
pub mod password;
pub mod rbac;

pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator, ResetToken};
pub use rbac::Authorizer;
