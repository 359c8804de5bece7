//! # klink-entity
//!
//! Domain models for the K-Link commerce API. Row structs derive
//! `sqlx::FromRow`; request DTOs derive `validator::Validate`. Each table is
//! also described by a static [`resource::Schema`] which drives the generic
//! CRUD repository.

pub mod file;
pub mod permission;
pub mod product;
pub mod resource;
pub mod role;
pub mod user;
pub mod validation;

pub use resource::{Column, ColumnKind, DeleteGuard, Relation, Resource, Schema};
