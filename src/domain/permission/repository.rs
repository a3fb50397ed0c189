use async_trait::async_trait;

use super::model::Permission;
use super::registry::PermissionDef;
use crate::domain::user::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn find_all(&self) -> DomainResult<Vec<Permission>>;

    /// Insert every definition that has no row yet. Returns how many rows
    /// were created.
    async fn sync(&self, defs: &[PermissionDef]) -> DomainResult<usize>;
}

/// Lookups behind the per-request authorization decision.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn find_user(&self, user_id: &str) -> DomainResult<Option<User>>;

    /// Whether the role has a role-permission row naming `permission`
    async fn role_grants(&self, role_id: &str, permission: &str) -> DomainResult<bool>;

    /// Whether the user has a direct user-permission row naming `permission`
    async fn user_grants(&self, user_id: &str, permission: &str) -> DomainResult<bool>;
}
