//! # klink-database
//!
//! PostgreSQL connection management, migrations, the generic resource
//! repository, and the few hand-written queries the auth and upload flows
//! need.

pub mod connection;
pub mod document;
pub mod error;
pub mod migration;
pub mod repositories;
pub mod seed;

pub use connection::DatabasePool;
pub use repositories::ResourceRepository;
