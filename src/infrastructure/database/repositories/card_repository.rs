use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Select, Set};

use super::customer_repository::load_customers;
use super::db_err;
use crate::domain::card::{CardField, CardRepository, CardTable};
use crate::domain::table::{Predicate, TableInfo, TableQueryParameter, TableRepository};
use crate::domain::{Card, Customer, DomainError, DomainResult};
use crate::infrastructure::database::entities::{card, customer};
use crate::infrastructure::database::table::{self, fold, qualified, SeaOrmTable};

pub struct SeaOrmCardRepository {
    db: DatabaseConnection,
}

impl SeaOrmCardRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_customers(
        &self,
        models: Vec<card::Model>,
        include_customer: bool,
    ) -> DomainResult<Vec<Card>> {
        let customers = if include_customer {
            load_customers(&self.db, models.iter().map(|m| m.customer_id.clone()).collect())
                .await?
        } else {
            HashMap::new()
        };
        Ok(models
            .into_iter()
            .map(|m| {
                let customer = customers.get(&m.customer_id).cloned();
                card_to_domain(m, customer)
            })
            .collect())
    }
}

impl SeaOrmTable for CardTable {
    type Entity = card::Entity;

    fn select() -> Select<card::Entity> {
        card::Entity::find().left_join(customer::Entity)
    }

    fn column(field: CardField) -> SimpleExpr {
        match field {
            CardField::Id => qualified(card::Column::Id),
            CardField::CardNumber => qualified(card::Column::CardNumber),
            CardField::CardType => qualified(card::Column::CardType),
            CardField::CustomerId => qualified(card::Column::CustomerId),
            CardField::CustomerFullName => qualified(customer::Column::FullName),
            CardField::CustomerPhone => qualified(customer::Column::Phone),
            CardField::ExpiresTime => qualified(card::Column::ExpiresTime),
            CardField::CreatedTime => qualified(card::Column::CreatedTime),
            CardField::ModifiedTime => qualified(card::Column::ModifiedTime),
        }
    }

    fn folded(field: CardField) -> Option<SimpleExpr> {
        match field {
            CardField::CardNumber => Some(qualified(card::Column::CardNumberFolded)),
            CardField::CardType => Some(qualified(card::Column::CardTypeFolded)),
            CardField::CustomerFullName => Some(qualified(customer::Column::FullNameFolded)),
            CardField::CustomerPhone => Some(qualified(customer::Column::PhoneFolded)),
            _ => None,
        }
    }

    fn key() -> SimpleExpr {
        qualified(card::Column::Id)
    }
}

pub(super) fn card_to_domain(model: card::Model, customer: Option<Customer>) -> Card {
    Card {
        id: model.id,
        card_number: model.card_number,
        card_type: model.card_type,
        customer_id: model.customer_id,
        is_active: model.is_active,
        expires_time: model.expires_time,
        created_time: model.created_time,
        modified_time: model.modified_time,
        customer,
    }
}

fn card_to_active(c: Card) -> card::ActiveModel {
    card::ActiveModel {
        id: Set(c.id),
        card_number_folded: Set(fold(&c.card_number)),
        card_type_folded: Set(fold(&c.card_type)),
        card_number: Set(c.card_number),
        card_type: Set(c.card_type),
        customer_id: Set(c.customer_id),
        is_active: Set(c.is_active),
        expires_time: Set(c.expires_time),
        created_time: Set(c.created_time),
        modified_time: Set(c.modified_time),
    }
}

/// Cards by id, for materializing `card` navigations
pub(super) async fn load_cards(
    db: &DatabaseConnection,
    ids: Vec<String>,
) -> DomainResult<HashMap<String, Card>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let models = card::Entity::find()
        .filter(card::Column::Id.is_in(ids))
        .all(db)
        .await
        .map_err(db_err)?;
    Ok(models
        .into_iter()
        .map(|m| (m.id.clone(), card_to_domain(m, None)))
        .collect())
}

#[async_trait]
impl TableRepository<CardTable> for SeaOrmCardRepository {
    async fn fetch_page(
        &self,
        query: &TableQueryParameter<CardField>,
    ) -> DomainResult<TableInfo<Card>> {
        let (models, total) = table::fetch_models::<CardTable>(&self.db, query)
            .await
            .map_err(db_err)?;
        let items = self
            .with_customers(models, query.includes("customer"))
            .await?;
        Ok(TableInfo::new(items, total, query.pager.size))
    }

    async fn find_one(&self, predicate: &Predicate<CardField>) -> DomainResult<Option<Card>> {
        let Some(model) = table::find_first::<CardTable>(&self.db, predicate)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };
        Ok(self.with_customers(vec![model], true).await?.pop())
    }

    async fn exists(&self, predicate: &Predicate<CardField>) -> DomainResult<bool> {
        table::any_match::<CardTable>(&self.db, predicate)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl CardRepository for SeaOrmCardRepository {
    async fn insert(&self, card: Card) -> DomainResult<Card> {
        let model = card_to_active(card)
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        Ok(card_to_domain(model, None))
    }

    async fn update(&self, mut card: Card) -> DomainResult<Card> {
        card.modified_time = Utc::now();
        let model = card_to_active(card)
            .update(&self.db)
            .await
            .map_err(db_err)?;
        Ok(card_to_domain(model, None))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = card::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Card", id));
        }
        Ok(())
    }
}
