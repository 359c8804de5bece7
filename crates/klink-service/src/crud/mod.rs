//! Generic CRUD over any [`klink_entity::Resource`].

pub mod hooks;
pub mod service;

pub use hooks::{NoHook, UserWriteHook, WriteHook};
pub use service::{ALREADY_APPLIED, CrudService, NOT_FOUND, Page};
