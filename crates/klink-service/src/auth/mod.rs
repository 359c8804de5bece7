//! Authentication flows.

pub mod dto;
pub mod service;

pub use dto::{
    AuthSession, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest,
    ResetPasswordRequest, SignupRequest,
};
pub use service::AuthService;
