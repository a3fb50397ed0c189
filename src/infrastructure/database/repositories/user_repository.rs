use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

use super::db_err;
use super::role_repository::{permission_ids, role_to_domain};
use crate::domain::table::{Predicate, TableInfo, TableQueryParameter, TableRepository};
use crate::domain::user::{UserField, UserRepository, UserTable};
use crate::domain::{DomainError, DomainResult, Role, User};
use crate::infrastructure::database::entities::{permission, role, user, user_permission};
use crate::infrastructure::database::table::{self, fold, qualified, SeaOrmTable};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_roles(&self, models: Vec<user::Model>) -> DomainResult<Vec<User>> {
        let ids: Vec<String> = models.iter().filter_map(|m| m.role_id.clone()).collect();
        let roles: HashMap<String, Role> = if ids.is_empty() {
            HashMap::new()
        } else {
            role::Entity::find()
                .filter(role::Column::Id.is_in(ids))
                .all(&self.db)
                .await
                .map_err(db_err)?
                .into_iter()
                .map(|m| (m.id.clone(), role_to_domain(m)))
                .collect()
        };

        Ok(models
            .into_iter()
            .map(|m| {
                let role = m.role_id.as_ref().and_then(|id| roles.get(id)).cloned();
                user_to_domain(m, role)
            })
            .collect())
    }

    async fn set_field(&self, id: &str, active: user::ActiveModel) -> DomainResult<()> {
        let result = user::Entity::update_many()
            .set(active)
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User", id));
        }
        Ok(())
    }
}

impl SeaOrmTable for UserTable {
    type Entity = user::Entity;

    fn select() -> Select<user::Entity> {
        user::Entity::find().left_join(role::Entity)
    }

    fn column(field: UserField) -> SimpleExpr {
        match field {
            UserField::Id => qualified(user::Column::Id),
            UserField::Username => qualified(user::Column::Username),
            UserField::Email => qualified(user::Column::Email),
            UserField::FullName => qualified(user::Column::FullName),
            UserField::RoleId => qualified(user::Column::RoleId),
            UserField::RoleName => qualified(role::Column::Name),
            UserField::CreatedTime => qualified(user::Column::CreatedTime),
            UserField::ModifiedTime => qualified(user::Column::ModifiedTime),
        }
    }

    fn folded(field: UserField) -> Option<SimpleExpr> {
        match field {
            UserField::Username => Some(qualified(user::Column::UsernameFolded)),
            UserField::Email => Some(qualified(user::Column::EmailFolded)),
            UserField::FullName => Some(qualified(user::Column::FullNameFolded)),
            UserField::RoleName => Some(qualified(role::Column::NameFolded)),
            _ => None,
        }
    }

    fn key() -> SimpleExpr {
        qualified(user::Column::Id)
    }
}

pub(super) fn user_to_domain(model: user::Model, role: Option<Role>) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        full_name: model.full_name,
        password_hash: model.password_hash,
        role_id: model.role_id,
        is_active: model.is_active,
        created_time: model.created_time,
        modified_time: model.modified_time,
        last_login_time: model.last_login_time,
        role,
    }
}

#[async_trait]
impl TableRepository<UserTable> for SeaOrmUserRepository {
    async fn fetch_page(
        &self,
        query: &TableQueryParameter<UserField>,
    ) -> DomainResult<TableInfo<User>> {
        let (models, total) = table::fetch_models::<UserTable>(&self.db, query)
            .await
            .map_err(db_err)?;
        let items = if query.includes("role") {
            self.with_roles(models).await?
        } else {
            models.into_iter().map(|m| user_to_domain(m, None)).collect()
        };
        Ok(TableInfo::new(items, total, query.pager.size))
    }

    async fn find_one(&self, predicate: &Predicate<UserField>) -> DomainResult<Option<User>> {
        let Some(model) = table::find_first::<UserTable>(&self.db, predicate)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };
        Ok(self.with_roles(vec![model]).await?.pop())
    }

    async fn exists(&self, predicate: &Predicate<UserField>) -> DomainResult<bool> {
        table::any_match::<UserTable>(&self.db, predicate)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_login(&self, username_or_email: &str) -> DomainResult<Option<User>> {
        let Some(model) = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(username_or_email))
                    .add(user::Column::Email.eq(username_or_email)),
            )
            .order_by_asc(user::Column::Id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };
        Ok(self.with_roles(vec![model]).await?.pop())
    }

    async fn insert(&self, user: User) -> DomainResult<User> {
        let model = user::ActiveModel {
            id: Set(user.id),
            username_folded: Set(fold(&user.username)),
            email_folded: Set(fold(&user.email)),
            full_name_folded: Set(fold(&user.full_name)),
            username: Set(user.username),
            email: Set(user.email),
            full_name: Set(user.full_name),
            password_hash: Set(user.password_hash),
            role_id: Set(user.role_id),
            is_active: Set(user.is_active),
            created_time: Set(user.created_time),
            modified_time: Set(user.modified_time),
            last_login_time: Set(user.last_login_time),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(user_to_domain(model, user.role))
    }

    /// Profile fields only; password and login time have their own calls.
    async fn update(&self, user: User) -> DomainResult<User> {
        let model = user::ActiveModel {
            id: Set(user.id),
            email_folded: Set(fold(&user.email)),
            full_name_folded: Set(fold(&user.full_name)),
            email: Set(user.email),
            full_name: Set(user.full_name),
            role_id: Set(user.role_id),
            is_active: Set(user.is_active),
            modified_time: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;
        Ok(user_to_domain(model, None))
    }

    async fn update_password(&self, id: &str, password_hash: &str) -> DomainResult<()> {
        self.set_field(
            id,
            user::ActiveModel {
                password_hash: Set(password_hash.to_string()),
                modified_time: Set(Utc::now()),
                ..Default::default()
            },
        )
        .await
    }

    async fn touch_last_login(&self, id: &str) -> DomainResult<()> {
        self.set_field(
            id,
            user::ActiveModel {
                last_login_time: Set(Some(Utc::now())),
                ..Default::default()
            },
        )
        .await
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User", id));
        }
        Ok(())
    }

    async fn permission_names(&self, user_id: &str) -> DomainResult<Vec<String>> {
        permission::Entity::find()
            .select_only()
            .column(permission::Column::Name)
            .inner_join(user_permission::Entity)
            .filter(user_permission::Column::UserId.eq(user_id))
            .order_by_asc(permission::Column::Name)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn set_permissions(&self, user_id: &str, names: &[String]) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let ids = permission_ids(&txn, names).await?;
        user_permission::Entity::delete_many()
            .filter(user_permission::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if !ids.is_empty() {
            user_permission::Entity::insert_many(ids.into_iter().map(|permission_id| {
                user_permission::ActiveModel {
                    user_id: Set(user_id.to_string()),
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
