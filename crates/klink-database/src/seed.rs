//! Loading the permission and role seed sets.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use klink_core::{AppError, AppResult};
use klink_entity::permission::{CreatePermission, Permission};
use klink_entity::role::CreateRole;
use klink_entity::validation::validate;

use crate::repositories::{PermissionRepository, RoleRepository};

/// One entry of `roles.json`.
///
/// `permissions` holds `key:action` references, or `"*"` for every
/// permission present in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleSeed {
    pub name: String,
    #[serde(rename = "type")]
    pub role_type: String,
    pub description: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Resolve `key:action` references against the known permissions.
pub fn resolve_permission_refs(refs: &[String], known: &[Permission]) -> AppResult<Vec<Uuid>> {
    if refs.iter().any(|r| r == "*") {
        return Ok(known.iter().map(|p| p.id).collect());
    }

    refs.iter()
        .map(|reference| {
            let (key, action) = reference.split_once(':').ok_or_else(|| {
                AppError::validation(format!(
                    "Invalid permission reference '{reference}', expected key:action"
                ))
            })?;
            known
                .iter()
                .find(|p| p.key == key && p.action == action)
                .map(|p| p.id)
                .ok_or_else(|| {
                    AppError::not_found(format!("Permission '{reference}' has not been seeded"))
                })
        })
        .collect()
}

/// Upsert every permission seed. Returns how many were written.
pub async fn import_permissions(pool: &PgPool, seeds: &[CreatePermission]) -> AppResult<usize> {
    let repo = PermissionRepository::new(pool.clone());
    for seed in seeds {
        validate(seed)?;
        repo.upsert(seed).await?;
    }
    info!(count = seeds.len(), "Imported permissions");
    Ok(seeds.len())
}

/// Insert every role seed, resolving its permission references.
pub async fn import_roles(pool: &PgPool, seeds: &[RoleSeed]) -> AppResult<usize> {
    let known = PermissionRepository::new(pool.clone()).find_all().await?;
    let roles = RoleRepository::new(pool.clone());

    for seed in seeds {
        let role = CreateRole {
            name: seed.name.clone(),
            role_type: seed.role_type.clone(),
            description: seed.description.clone(),
            permission_ids: resolve_permission_refs(&seed.permissions, &known)?,
        };
        validate(&role)?;
        roles.create(&role).await?;
    }
    info!(count = seeds.len(), "Imported roles");
    Ok(seeds.len())
}

/// Delete every permission.
pub async fn delete_permissions(pool: &PgPool) -> AppResult<u64> {
    let deleted = PermissionRepository::new(pool.clone()).delete_all().await?;
    info!(deleted, "Deleted permissions");
    Ok(deleted)
}

/// Delete every role.
pub async fn delete_roles(pool: &PgPool) -> AppResult<u64> {
    let deleted = RoleRepository::new(pool.clone()).delete_all().await?;
    info!(deleted, "Deleted roles");
    Ok(deleted)
}
