use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use super::db_err;
use crate::domain::role::RoleRepository;
use crate::domain::{DomainError, DomainResult, Role};
use crate::infrastructure::database::entities::{permission, role, role_permission};
use crate::infrastructure::database::table::fold;

pub struct SeaOrmRoleRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(super) fn role_to_domain(model: role::Model) -> Role {
    Role {
        id: model.id,
        name: model.name,
        description: model.description,
        created_time: model.created_time,
        modified_time: model.modified_time,
    }
}

/// Ids of the permissions named in `names`; every name must exist.
pub(super) async fn permission_ids<C: sea_orm::ConnectionTrait>(
    db: &C,
    names: &[String],
) -> DomainResult<Vec<String>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<String> = permission::Entity::find()
        .select_only()
        .column(permission::Column::Id)
        .filter(permission::Column::Name.is_in(names.iter().cloned()))
        .into_tuple()
        .all(db)
        .await
        .map_err(db_err)?;
    if ids.len() != names.len() {
        return Err(DomainError::Validation(
            "One or more permissions are not registered".into(),
        ));
    }
    Ok(ids)
}

#[async_trait]
impl RoleRepository for SeaOrmRoleRepository {
    async fn find_all(&self) -> DomainResult<Vec<Role>> {
        let models = role::Entity::find()
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(role_to_domain).collect())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Role>> {
        let model = role::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(role_to_domain))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Role>> {
        let model = role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(role_to_domain))
    }

    async fn insert(&self, role: Role) -> DomainResult<Role> {
        let model = role::ActiveModel {
            id: Set(role.id),
            name_folded: Set(fold(&role.name)),
            name: Set(role.name),
            description: Set(role.description),
            created_time: Set(role.created_time),
            modified_time: Set(role.modified_time),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(role_to_domain(model))
    }

    async fn update(&self, role: Role) -> DomainResult<Role> {
        let model = role::ActiveModel {
            id: Set(role.id),
            name_folded: Set(fold(&role.name)),
            name: Set(role.name),
            description: Set(role.description),
            created_time: Set(role.created_time),
            modified_time: Set(Utc::now()),
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;
        Ok(role_to_domain(model))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = role::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Role", id));
        }
        Ok(())
    }

    async fn permission_names(&self, role_id: &str) -> DomainResult<Vec<String>> {
        permission::Entity::find()
            .select_only()
            .column(permission::Column::Name)
            .inner_join(role_permission::Entity)
            .filter(role_permission::Column::RoleId.eq(role_id))
            .order_by_asc(permission::Column::Name)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn set_permissions(&self, role_id: &str, names: &[String]) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let ids = permission_ids(&txn, names).await?;
        role_permission::Entity::delete_many()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if !ids.is_empty() {
            role_permission::Entity::insert_many(ids.into_iter().map(|permission_id| {
                role_permission::ActiveModel {
                    role_id: Set(role_id.to_string()),
                    permission_id: Set(permission_id),
                }
            }))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)
    }
}
