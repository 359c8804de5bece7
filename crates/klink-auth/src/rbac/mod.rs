//! Role-based access control.

pub mod enforcer;

pub use enforcer::Authorizer;
