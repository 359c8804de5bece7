//! Repository implementations.

pub mod file;
pub mod permission;
pub mod resource;
pub mod role;
pub mod user;

pub use file::FileRepository;
pub use permission::PermissionRepository;
pub use resource::ResourceRepository;
pub use role::RoleRepository;
pub use user::UserRepository;
