use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::info;

use super::db_err;
use super::user_repository::user_to_domain;
use crate::domain::permission::{PermissionDef, PermissionRepository, PermissionStore};
use crate::domain::{DomainResult, Permission, User};
use crate::infrastructure::database::entities::{
    permission, role_permission, user, user_permission,
};

pub struct SeaOrmPermissionRepository {
    db: DatabaseConnection,
}

impl SeaOrmPermissionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn permission_to_domain(model: permission::Model) -> Permission {
    Permission {
        id: model.id,
        name: model.name,
        resource: model.resource,
        action: model.action,
        description: model.description,
        created_time: model.created_time,
    }
}

#[async_trait]
impl PermissionRepository for SeaOrmPermissionRepository {
    async fn find_all(&self) -> DomainResult<Vec<Permission>> {
        let models = permission::Entity::find()
            .order_by_asc(permission::Column::Resource)
            .order_by_asc(permission::Column::Action)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(permission_to_domain).collect())
    }

    async fn sync(&self, defs: &[PermissionDef]) -> DomainResult<usize> {
        let existing: HashSet<String> = permission::Entity::find()
            .select_only()
            .column(permission::Column::Name)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .collect();

        let now = Utc::now();
        let missing: Vec<permission::ActiveModel> = defs
            .iter()
            .filter(|d| !existing.contains(&d.name))
            .map(|d| permission::ActiveModel {
                id: Set(uuid::Uuid::new_v4().to_string()),
                name: Set(d.name.clone()),
                resource: Set(d.resource.clone()),
                action: Set(d.action.clone()),
                description: Set(Some(d.display_name.clone())),
                created_time: Set(now),
            })
            .collect();

        let created = missing.len();
        if created > 0 {
            permission::Entity::insert_many(missing)
                .exec(&self.db)
                .await
                .map_err(db_err)?;
            info!(created, "Permission catalog synced");
        }
        Ok(created)
    }
}

/// Lookups for the per-request permission check
pub struct SeaOrmPermissionStore {
    db: DatabaseConnection,
}

impl SeaOrmPermissionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PermissionStore for SeaOrmPermissionStore {
    async fn find_user(&self, user_id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(|m| user_to_domain(m, None)))
    }

    async fn role_grants(&self, role_id: &str, permission: &str) -> DomainResult<bool> {
        let count = role_permission::Entity::find()
            .inner_join(permission::Entity)
            .filter(role_permission::Column::RoleId.eq(role_id))
            .filter(permission::Column::Name.eq(permission))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn user_grants(&self, user_id: &str, permission: &str) -> DomainResult<bool> {
        let count = user_permission::Entity::find()
            .inner_join(permission::Entity)
            .filter(user_permission::Column::UserId.eq(user_id))
            .filter(permission::Column::Name.eq(permission))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::permission::PermissionRegistry;
    use crate::domain::role::RoleRepository;
    use crate::domain::user::UserRepository;
    use crate::domain::Role;
    use crate::infrastructure::database::repositories::role_repository::SeaOrmRoleRepository;
    use crate::infrastructure::database::repositories::user_repository::SeaOrmUserRepository;
    use crate::infrastructure::database::testing::memory_db;

    #[tokio::test]
    async fn sync_is_idempotent() {
        let db = memory_db().await;
        let repo = SeaOrmPermissionRepository::new(db);
        let registry = PermissionRegistry::builtin();

        assert_eq!(repo.sync(registry.all()).await.unwrap(), registry.all().len());
        assert_eq!(repo.sync(registry.all()).await.unwrap(), 0);
        assert_eq!(repo.find_all().await.unwrap().len(), registry.all().len());
    }

    #[tokio::test]
    async fn store_answers_role_and_direct_grants() {
        let db = memory_db().await;
        SeaOrmPermissionRepository::new(db.clone())
            .sync(PermissionRegistry::builtin().all())
            .await
            .unwrap();

        let roles = SeaOrmRoleRepository::new(db.clone());
        let role = roles.insert(Role::new("Cashier", None)).await.unwrap();
        roles
            .set_permissions(&role.id, &["ticket.view".to_string()])
            .await
            .unwrap();

        let users = SeaOrmUserRepository::new(db.clone());
        let user = users
            .insert(User::new("cash", "cash@example.com", "Cash", "hash", Some(role.id.clone())))
            .await
            .unwrap();
        users
            .set_permissions(&user.id, &["card.view".to_string()])
            .await
            .unwrap();

        let store = SeaOrmPermissionStore::new(db);
        let found = store.find_user(&user.id).await.unwrap().unwrap();
        assert_eq!(found.role_id.as_deref(), Some(role.id.as_str()));

        assert!(store.role_grants(&role.id, "ticket.view").await.unwrap());
        assert!(!store.role_grants(&role.id, "card.view").await.unwrap());
        assert!(store.user_grants(&user.id, "card.view").await.unwrap());
        assert!(!store.user_grants(&user.id, "ticket.view").await.unwrap());
    }
}
