//! User management service
//!
//! HTTP handlers are thin wrappers that delegate here.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::application::table::load_table;
use crate::domain::table::{Predicate, TableInfo, TablePageParameter};
use crate::domain::user::{UserField, UserTable};
use crate::domain::{DomainError, DomainResult, PermissionRegistry, RepositoryProvider, User};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

/// Returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// The caller's account and everything it is allowed to do
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    /// Union of role and direct grants, sorted
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub role_id: Option<String>,
}

/// `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub full_name: Option<String>,
    /// An empty string clears the role
    pub role_id: Option<String>,
    pub is_active: Option<bool>,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    registry: Arc<PermissionRegistry>,
    jwt_config: JwtConfig,
}

impl UserService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        registry: Arc<PermissionRegistry>,
        jwt_config: JwtConfig,
    ) -> Self {
        Self {
            repos,
            registry,
            jwt_config,
        }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by username or email and issue a JWT.
    pub async fn login(&self, username_or_email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self
            .repos
            .users()
            .find_by_login(username_or_email.trim())
            .await?
        else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        if !verify_password(password, &user.password_hash).unwrap_or(false) {
            warn!(username = %user.username, "Failed login attempt");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(
            &user.id,
            &user.username,
            user.role_name().unwrap_or_default(),
            &self.jwt_config,
        )
        .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;

        self.repos.users().touch_last_login(&user.id).await?;
        info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expires_in(),
            user,
        })
    }

    /// Change the caller's password after verifying the current one.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        Self::check_password(new_password)?;

        let user = self.get_user(user_id).await?;
        if !verify_password(current_password, &user.password_hash).unwrap_or(false) {
            return Err(DomainError::Unauthorized("Invalid current password".into()));
        }

        let new_hash = hash_password(new_password)?;
        self.repos
            .users()
            .update_password(user_id, &new_hash)
            .await?;

        info!(user_id, "Password changed");
        Ok(())
    }

    pub async fn profile(&self, user_id: &str) -> DomainResult<UserProfile> {
        let user = self.get_user(user_id).await?;

        let mut permissions: BTreeSet<String> = self
            .repos
            .users()
            .permission_names(&user.id)
            .await?
            .into_iter()
            .collect();
        if let Some(role_id) = user.role_id.as_deref() {
            permissions.extend(self.repos.roles().permission_names(role_id).await?);
        }

        Ok(UserProfile {
            user,
            permissions: permissions.into_iter().collect(),
        })
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn table(&self, param: &TablePageParameter) -> DomainResult<TableInfo<User>> {
        load_table::<UserTable, _>(self.repos.users(), param).await
    }

    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_one(&Predicate::equals(UserField::Id, id))
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// Direct (non-role) grants of a user
    pub async fn permissions(&self, id: &str) -> DomainResult<Vec<String>> {
        let user = self.get_user(id).await?;
        self.repos.users().permission_names(&user.id).await
    }

    // ── Commands ────────────────────────────────────────────────

    pub async fn create_user(&self, cmd: CreateUser) -> DomainResult<User> {
        let username = cmd.username.trim().to_string();
        let email = cmd.email.trim().to_string();
        if username.len() < 3 || username.len() > 50 {
            return Err(DomainError::Validation(
                "Username must be 3-50 characters".into(),
            ));
        }
        Self::check_email(&email)?;
        Self::check_password(&cmd.password)?;

        self.ensure_unique(UserField::Username, &username, None).await?;
        self.ensure_unique(UserField::Email, &email, None).await?;

        let role_id = match cmd.role_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Some(self.ensure_role(id).await?),
            _ => None,
        };

        let password_hash = hash_password(&cmd.password)?;
        let user = self
            .repos
            .users()
            .insert(User::new(
                username,
                email,
                cmd.full_name.trim(),
                password_hash,
                role_id,
            ))
            .await?;

        info!(user_id = %user.id, username = %user.username, "User created");
        self.get_user(&user.id).await
    }

    pub async fn update_user(&self, id: &str, cmd: UpdateUser) -> DomainResult<User> {
        let mut user = self.get_user(id).await?;

        if let Some(email) = cmd.email {
            let email = email.trim().to_string();
            Self::check_email(&email)?;
            if email != user.email {
                self.ensure_unique(UserField::Email, &email, Some(&user.id))
                    .await?;
                user.email = email;
            }
        }
        if let Some(full_name) = cmd.full_name {
            user.full_name = full_name.trim().to_string();
        }
        if let Some(role_id) = cmd.role_id {
            let role_id = role_id.trim();
            user.role_id = if role_id.is_empty() {
                None
            } else {
                Some(self.ensure_role(role_id).await?)
            };
        }
        if let Some(is_active) = cmd.is_active {
            user.is_active = is_active;
        }

        self.repos.users().update(user).await?;
        info!(user_id = id, "User updated");
        self.get_user(id).await
    }

    /// Delete a user. Callers cannot delete their own account.
    pub async fn delete_user(&self, id: &str, acting_user_id: &str) -> DomainResult<()> {
        if id == acting_user_id {
            return Err(DomainError::Validation(
                "You cannot delete your own account".into(),
            ));
        }
        let user = self.get_user(id).await?;
        self.repos.users().delete(&user.id).await?;
        info!(user_id = id, username = %user.username, "User deleted");
        Ok(())
    }

    /// Replace the user's direct grants. Returns the stored set.
    pub async fn set_permissions(&self, id: &str, names: &[String]) -> DomainResult<Vec<String>> {
        let user = self.get_user(id).await?;
        let names = self.registry.validate_names(names)?;
        self.repos.users().set_permissions(&user.id, &names).await?;
        info!(user_id = id, grants = names.len(), "User permissions replaced");
        Ok(names)
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn ensure_unique(
        &self,
        field: UserField,
        value: &str,
        except_id: Option<&str>,
    ) -> DomainResult<()> {
        if let Some(existing) = self
            .repos
            .users()
            .find_one(&Predicate::equals(field, value))
            .await?
        {
            if Some(existing.id.as_str()) != except_id {
                return Err(DomainError::Conflict(format!(
                    "User with {:?} '{}' already exists",
                    field, value
                )));
            }
        }
        Ok(())
    }

    async fn ensure_role(&self, role_id: &str) -> DomainResult<String> {
        match self.repos.roles().find_by_id(role_id).await? {
            Some(role) => Ok(role.id),
            None => Err(DomainError::Validation(format!(
                "Role '{}' does not exist",
                role_id
            ))),
        }
    }

    fn check_email(email: &str) -> DomainResult<()> {
        if !email.contains('@') || email.len() > 255 {
            return Err(DomainError::Validation("Invalid email address".into()));
        }
        Ok(())
    }

    fn check_password(password: &str) -> DomainResult<()> {
        if password.len() < 8 {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::infrastructure::crypto::jwt::verify_token;
    use crate::infrastructure::database::testing::memory_repositories;

    async fn service() -> (UserService, Arc<dyn RepositoryProvider>) {
        let repos = memory_repositories().await;
        let registry = Arc::new(PermissionRegistry::builtin());
        repos.permissions().sync(registry.all()).await.unwrap();
        let svc = UserService::new(repos.clone(), registry, JwtConfig::default());
        (svc, repos)
    }

    fn alice() -> CreateUser {
        CreateUser {
            username: "alice".into(),
            email: "alice@example.com".into(),
            full_name: "Alice Nguyen".into(),
            password: "correct-horse".into(),
            role_id: None,
        }
    }

    #[tokio::test]
    async fn login_issues_token_for_subject() {
        let (svc, _) = service().await;
        let user = svc.create_user(alice()).await.unwrap();

        let auth = svc.login("alice@example.com", "correct-horse").await.unwrap();
        assert_eq!(auth.token_type, "Bearer");
        let claims = verify_token(&auth.token, &JwtConfig::default()).unwrap();
        assert_eq!(claims.sub, user.id);

        let reloaded = svc.get_user(&user.id).await.unwrap();
        assert!(reloaded.last_login_time.is_some());
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let (svc, _) = service().await;
        svc.create_user(alice()).await.unwrap();
        let err = svc.login("alice", "wrong-password").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn disabled_account_cannot_log_in() {
        let (svc, _) = service().await;
        let user = svc.create_user(alice()).await.unwrap();
        svc.update_user(
            &user.id,
            UpdateUser {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = svc.login("alice", "correct-horse").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn duplicate_username_is_conflict() {
        let (svc, _) = service().await;
        svc.create_user(alice()).await.unwrap();
        let mut other = alice();
        other.email = "other@example.com".into();
        let err = svc.create_user(other).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn unknown_role_is_rejected() {
        let (svc, _) = service().await;
        let mut cmd = alice();
        cmd.role_id = Some(uuid::Uuid::new_v4().to_string());
        let err = svc.create_user(cmd).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn change_password_requires_current() {
        let (svc, _) = service().await;
        let user = svc.create_user(alice()).await.unwrap();

        let err = svc
            .change_password(&user.id, "bad-guess", "new-password-1")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        svc.change_password(&user.id, "correct-horse", "new-password-1")
            .await
            .unwrap();
        assert!(svc.login("alice", "new-password-1").await.is_ok());
    }

    #[tokio::test]
    async fn profile_merges_role_and_direct_grants() {
        let (svc, repos) = service().await;
        let role = repos
            .roles()
            .insert(Role::new("Cashier", None))
            .await
            .unwrap();
        repos
            .roles()
            .set_permissions(&role.id, &["ticket.view".to_string()])
            .await
            .unwrap();

        let mut cmd = alice();
        cmd.role_id = Some(role.id.clone());
        let user = svc.create_user(cmd).await.unwrap();
        assert_eq!(user.role_name(), Some("Cashier"));

        svc.set_permissions(&user.id, &["card.view".into(), "ticket.view".into()])
            .await
            .unwrap();

        let profile = svc.profile(&user.id).await.unwrap();
        assert_eq!(profile.permissions, vec!["card.view", "ticket.view"]);
    }

    #[tokio::test]
    async fn users_cannot_delete_themselves() {
        let (svc, _) = service().await;
        let user = svc.create_user(alice()).await.unwrap();
        let err = svc.delete_user(&user.id, &user.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn table_filters_by_role_name() {
        let (svc, repos) = service().await;
        let role = repos
            .roles()
            .insert(Role::new("Auditor", None))
            .await
            .unwrap();
        let mut cmd = alice();
        cmd.role_id = Some(role.id);
        svc.create_user(cmd).await.unwrap();
        svc.create_user(CreateUser {
            username: "bob".into(),
            email: "bob@example.com".into(),
            full_name: "Bob".into(),
            password: "correct-horse".into(),
            role_id: None,
        })
        .await
        .unwrap();

        let page = svc
            .table(&TablePageParameter::default().with_filter("RoleName", &["audit"]))
            .await
            .unwrap();
        assert_eq!(page.total_items_count, 1);
        assert_eq!(page.items[0].username, "alice");
        assert_eq!(page.items[0].role_name(), Some("Auditor"));
    }
}
