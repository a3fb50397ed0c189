use async_trait::async_trait;

use super::model::User;
use super::table::UserTable;
use crate::domain::table::TableRepository;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: TableRepository<UserTable> {
    /// Exact match on username or email
    async fn find_by_login(&self, username_or_email: &str) -> DomainResult<Option<User>>;
    async fn insert(&self, user: User) -> DomainResult<User>;
    async fn update(&self, user: User) -> DomainResult<User>;
    async fn update_password(&self, id: &str, password_hash: &str) -> DomainResult<()>;
    async fn touch_last_login(&self, id: &str) -> DomainResult<()>;
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// Names of the user's direct (non-role) permission grants, sorted
    async fn permission_names(&self, user_id: &str) -> DomainResult<Vec<String>>;

    /// Replace the user's direct grants with exactly `names`
    async fn set_permissions(&self, user_id: &str, names: &[String]) -> DomainResult<()>;
}
