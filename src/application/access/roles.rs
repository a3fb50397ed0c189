//! Role management
//!
//! Roles are named permission sets. A role still assigned to a user
//! cannot be deleted.

use std::sync::Arc;

use tracing::info;

use crate::domain::table::Predicate;
use crate::domain::user::UserField;
use crate::domain::{DomainError, DomainResult, PermissionRegistry, RepositoryProvider, Role};

/// A role together with the permission names it grants
#[derive(Debug, Clone)]
pub struct RoleDetails {
    pub role: Role,
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CreateRole {
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

/// `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateRole {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
}

/// One row of the permission catalog
#[derive(Debug, Clone)]
pub struct PermissionEntry {
    pub id: String,
    pub name: String,
    pub resource: String,
    pub action: String,
    pub display_name: String,
}

pub struct RoleService {
    repos: Arc<dyn RepositoryProvider>,
    registry: Arc<PermissionRegistry>,
}

impl RoleService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, registry: Arc<PermissionRegistry>) -> Self {
        Self { repos, registry }
    }

    pub async fn list(&self) -> DomainResult<Vec<RoleDetails>> {
        let roles = self.repos.roles().find_all().await?;
        let mut out = Vec::with_capacity(roles.len());
        for role in roles {
            let permissions = self.repos.roles().permission_names(&role.id).await?;
            out.push(RoleDetails { role, permissions });
        }
        Ok(out)
    }

    pub async fn get(&self, id: &str) -> DomainResult<RoleDetails> {
        let role = self.find(id).await?;
        let permissions = self.repos.roles().permission_names(&role.id).await?;
        Ok(RoleDetails { role, permissions })
    }

    pub async fn create(&self, cmd: CreateRole) -> DomainResult<RoleDetails> {
        let name = Self::clean_name(&cmd.name)?;
        let permissions = self.registry.validate_names(&cmd.permissions)?;

        if self.repos.roles().find_by_name(&name).await?.is_some() {
            return Err(DomainError::Conflict(format!("Role '{}' already exists", name)));
        }

        let role = self
            .repos
            .roles()
            .insert(Role::new(name, cmd.description))
            .await?;
        self.repos
            .roles()
            .set_permissions(&role.id, &permissions)
            .await?;

        info!(role_id = %role.id, name = %role.name, grants = permissions.len(), "Role created");
        Ok(RoleDetails { role, permissions })
    }

    pub async fn update(&self, id: &str, cmd: UpdateRole) -> DomainResult<RoleDetails> {
        let mut role = self.find(id).await?;

        if let Some(name) = cmd.name {
            let name = Self::clean_name(&name)?;
            if name != role.name {
                if let Some(other) = self.repos.roles().find_by_name(&name).await? {
                    if other.id != role.id {
                        return Err(DomainError::Conflict(format!(
                            "Role '{}' already exists",
                            name
                        )));
                    }
                }
                role.name = name;
            }
        }
        if let Some(description) = cmd.description {
            role.description = Some(description).filter(|d| !d.trim().is_empty());
        }

        let role = self.repos.roles().update(role).await?;

        if let Some(permissions) = cmd.permissions {
            let permissions = self.registry.validate_names(&permissions)?;
            self.repos
                .roles()
                .set_permissions(&role.id, &permissions)
                .await?;
        }

        info!(role_id = %role.id, "Role updated");
        self.get(&role.id).await
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        let role = self.find(id).await?;

        let in_use = self
            .repos
            .users()
            .exists(&Predicate::equals(UserField::RoleId, role.id.as_str()))
            .await?;
        if in_use {
            return Err(DomainError::Conflict(format!(
                "Role '{}' is still assigned to users",
                role.name
            )));
        }

        self.repos.roles().delete(&role.id).await?;
        info!(role_id = %role.id, name = %role.name, "Role deleted");
        Ok(())
    }

    /// Persisted permissions with their display names
    pub async fn permission_catalog(&self) -> DomainResult<Vec<PermissionEntry>> {
        let rows = self.repos.permissions().find_all().await?;
        Ok(rows
            .into_iter()
            .map(|p| PermissionEntry {
                display_name: self
                    .registry
                    .display_name(&p.name)
                    .map(str::to_string)
                    .unwrap_or_else(|| p.name.clone()),
                id: p.id,
                name: p.name,
                resource: p.resource,
                action: p.action,
            })
            .collect())
    }

    async fn find(&self, id: &str) -> DomainResult<Role> {
        self.repos
            .roles()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Role", id))
    }

    fn clean_name(name: &str) -> DomainResult<String> {
        let name = name.trim();
        if name.is_empty() || name.len() > 100 {
            return Err(DomainError::Validation(
                "Role name must be 1-100 characters".into(),
            ));
        }
        Ok(name.to_string())
    }
}
