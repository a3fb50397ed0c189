use async_trait::async_trait;

use super::model::Role;
use crate::domain::DomainResult;

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_all(&self) -> DomainResult<Vec<Role>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Role>>;
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Role>>;
    async fn insert(&self, role: Role) -> DomainResult<Role>;
    async fn update(&self, role: Role) -> DomainResult<Role>;
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// Names of the permissions granted to a role, sorted
    async fn permission_names(&self, role_id: &str) -> DomainResult<Vec<String>>;

    /// Replace the role's grants with exactly `names`
    async fn set_permissions(&self, role_id: &str, names: &[String]) -> DomainResult<()>;
}
