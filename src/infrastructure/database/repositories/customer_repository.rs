use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Select, Set};

use super::db_err;
use crate::domain::customer::{CustomerField, CustomerRepository, CustomerTable};
use crate::domain::table::{Predicate, TableInfo, TableQueryParameter, TableRepository};
use crate::domain::{Customer, DomainError, DomainResult};
use crate::infrastructure::database::entities::customer;
use crate::infrastructure::database::table::{self, fold, fold_opt, qualified, SeaOrmTable};

pub struct SeaOrmCustomerRepository {
    db: DatabaseConnection,
}

impl SeaOrmCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl SeaOrmTable for CustomerTable {
    type Entity = customer::Entity;

    fn select() -> Select<customer::Entity> {
        customer::Entity::find()
    }

    fn column(field: CustomerField) -> SimpleExpr {
        match field {
            CustomerField::Id => qualified(customer::Column::Id),
            CustomerField::FullName => qualified(customer::Column::FullName),
            CustomerField::Phone => qualified(customer::Column::Phone),
            CustomerField::Email => qualified(customer::Column::Email),
            CustomerField::Address => qualified(customer::Column::Address),
            CustomerField::CreatedTime => qualified(customer::Column::CreatedTime),
            CustomerField::ModifiedTime => qualified(customer::Column::ModifiedTime),
        }
    }

    fn folded(field: CustomerField) -> Option<SimpleExpr> {
        let column = match field {
            CustomerField::FullName => customer::Column::FullNameFolded,
            CustomerField::Phone => customer::Column::PhoneFolded,
            CustomerField::Email => customer::Column::EmailFolded,
            CustomerField::Address => customer::Column::AddressFolded,
            _ => return None,
        };
        Some(qualified(column))
    }

    fn key() -> SimpleExpr {
        qualified(customer::Column::Id)
    }
}

pub(super) fn customer_to_domain(model: customer::Model) -> Customer {
    Customer {
        id: model.id,
        full_name: model.full_name,
        phone: model.phone,
        email: model.email,
        address: model.address,
        created_time: model.created_time,
        modified_time: model.modified_time,
    }
}

fn customer_to_active(c: Customer) -> customer::ActiveModel {
    customer::ActiveModel {
        id: Set(c.id),
        full_name_folded: Set(fold(&c.full_name)),
        phone_folded: Set(fold_opt(&c.phone)),
        email_folded: Set(fold_opt(&c.email)),
        address_folded: Set(fold_opt(&c.address)),
        full_name: Set(c.full_name),
        phone: Set(c.phone),
        email: Set(c.email),
        address: Set(c.address),
        created_time: Set(c.created_time),
        modified_time: Set(c.modified_time),
    }
}

/// Customers by id, for materializing `customer` navigations
pub(super) async fn load_customers(
    db: &DatabaseConnection,
    ids: Vec<String>,
) -> DomainResult<HashMap<String, Customer>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let models = customer::Entity::find()
        .filter(customer::Column::Id.is_in(ids))
        .all(db)
        .await
        .map_err(db_err)?;
    Ok(models
        .into_iter()
        .map(|m| (m.id.clone(), customer_to_domain(m)))
        .collect())
}

#[async_trait]
impl TableRepository<CustomerTable> for SeaOrmCustomerRepository {
    async fn fetch_page(
        &self,
        query: &TableQueryParameter<CustomerField>,
    ) -> DomainResult<TableInfo<Customer>> {
        let (models, total) = table::fetch_models::<CustomerTable>(&self.db, query)
            .await
            .map_err(db_err)?;
        let items = models.into_iter().map(customer_to_domain).collect();
        Ok(TableInfo::new(items, total, query.pager.size))
    }

    async fn find_one(&self, predicate: &Predicate<CustomerField>) -> DomainResult<Option<Customer>> {
        let model = table::find_first::<CustomerTable>(&self.db, predicate)
            .await
            .map_err(db_err)?;
        Ok(model.map(customer_to_domain))
    }

    async fn exists(&self, predicate: &Predicate<CustomerField>) -> DomainResult<bool> {
        table::any_match::<CustomerTable>(&self.db, predicate)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl CustomerRepository for SeaOrmCustomerRepository {
    async fn insert(&self, customer: Customer) -> DomainResult<Customer> {
        let model = customer_to_active(customer)
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        Ok(customer_to_domain(model))
    }

    async fn update(&self, mut customer: Customer) -> DomainResult<Customer> {
        customer.modified_time = Utc::now();
        let model = customer_to_active(customer)
            .update(&self.db)
            .await
            .map_err(db_err)?;
        Ok(customer_to_domain(model))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = customer::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Customer", id));
        }
        Ok(())
    }
}
