//! Startup seeding of the access-control tables
//!
//! Runs after migrations: the permission rows are synced from the
//! registry, the `Administrator` role is (re)granted every permission and,
//! on an empty users table, the configured default administrator is
//! created with that role.

use tracing::{info, warn};

use crate::config::AdminConfig;
use crate::domain::table::Predicate;
use crate::domain::{DomainResult, PermissionRegistry, RepositoryProvider, Role, User};
use crate::infrastructure::crypto::password::hash_password;

pub const ADMIN_ROLE: &str = "Administrator";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub permissions_created: usize,
    pub admin_role_created: bool,
    pub admin_user_created: bool,
}

/// Idempotent; safe to run on every start.
pub async fn seed_access(
    repos: &dyn RepositoryProvider,
    registry: &PermissionRegistry,
    default_admin: Option<&AdminConfig>,
) -> DomainResult<SeedReport> {
    let mut report = SeedReport {
        permissions_created: repos.permissions().sync(registry.all()).await?,
        ..SeedReport::default()
    };

    let role = match repos.roles().find_by_name(ADMIN_ROLE).await? {
        Some(role) => role,
        None => {
            report.admin_role_created = true;
            repos
                .roles()
                .insert(Role::new(
                    ADMIN_ROLE,
                    Some("Full access to every resource".to_string()),
                ))
                .await?
        }
    };
    let all: Vec<String> = registry.all().iter().map(|d| d.name.clone()).collect();
    repos.roles().set_permissions(&role.id, &all).await?;

    if let Some(admin) = default_admin {
        if !repos.users().exists(&Predicate::Always).await? {
            let password_hash = hash_password(&admin.password)?;
            let user = repos
                .users()
                .insert(User::new(
                    admin.username.trim(),
                    admin.email.trim(),
                    admin.full_name.trim(),
                    password_hash,
                    Some(role.id.clone()),
                ))
                .await?;
            report.admin_user_created = true;
            info!(username = %user.username, "Default administrator created");
            warn!("Change the default administrator password");
        }
    }

    info!(
        permissions_created = report.permissions_created,
        admin_role_created = report.admin_role_created,
        "Access control seeded"
    );
    Ok(report)
}
