use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Select, Set};

use super::card_repository::load_cards;
use super::customer_repository::load_customers;
use super::db_err;
use crate::domain::table::{Predicate, TableInfo, TableQueryParameter, TableRepository};
use crate::domain::ticket::{TicketField, TicketRepository, TicketTable};
use crate::domain::{Card, Customer, DomainError, DomainResult, Ticket, TicketStatus};
use crate::infrastructure::database::entities::{card, customer, ticket};
use crate::infrastructure::database::table::{self, fold, fold_opt, qualified, SeaOrmTable};

pub struct SeaOrmTicketRepository {
    db: DatabaseConnection,
}

impl SeaOrmTicketRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn materialize(
        &self,
        models: Vec<ticket::Model>,
        include_customer: bool,
        include_card: bool,
    ) -> DomainResult<Vec<Ticket>> {
        let customers = if include_customer {
            load_customers(
                &self.db,
                models.iter().filter_map(|m| m.customer_id.clone()).collect(),
            )
            .await?
        } else {
            HashMap::new()
        };
        let cards = if include_card {
            load_cards(
                &self.db,
                models.iter().filter_map(|m| m.card_id.clone()).collect(),
            )
            .await?
        } else {
            HashMap::new()
        };

        Ok(models
            .into_iter()
            .map(|m| {
                let customer = m.customer_id.as_ref().and_then(|id| customers.get(id)).cloned();
                let card = m.card_id.as_ref().and_then(|id| cards.get(id)).cloned();
                ticket_to_domain(m, customer, card)
            })
            .collect())
    }
}

impl SeaOrmTable for TicketTable {
    type Entity = ticket::Entity;

    fn select() -> Select<ticket::Entity> {
        ticket::Entity::find()
            .left_join(customer::Entity)
            .left_join(card::Entity)
    }

    fn column(field: TicketField) -> SimpleExpr {
        match field {
            TicketField::Id => qualified(ticket::Column::Id),
            TicketField::Code => qualified(ticket::Column::Code),
            TicketField::EventName => qualified(ticket::Column::EventName),
            TicketField::Venue => qualified(ticket::Column::Venue),
            TicketField::Seat => qualified(ticket::Column::Seat),
            TicketField::Price => qualified(ticket::Column::Price),
            TicketField::Status => qualified(ticket::Column::Status),
            TicketField::CustomerId => qualified(ticket::Column::CustomerId),
            TicketField::CardId => qualified(ticket::Column::CardId),
            TicketField::CustomerFullName => qualified(customer::Column::FullName),
            TicketField::CustomerPhone => qualified(customer::Column::Phone),
            TicketField::CardNumber => qualified(card::Column::CardNumber),
            TicketField::CreatedTime => qualified(ticket::Column::CreatedTime),
            TicketField::ModifiedTime => qualified(ticket::Column::ModifiedTime),
        }
    }

    fn folded(field: TicketField) -> Option<SimpleExpr> {
        match field {
            TicketField::Code => Some(qualified(ticket::Column::CodeFolded)),
            TicketField::EventName => Some(qualified(ticket::Column::EventNameFolded)),
            TicketField::Venue => Some(qualified(ticket::Column::VenueFolded)),
            TicketField::Seat => Some(qualified(ticket::Column::SeatFolded)),
            TicketField::CustomerFullName => Some(qualified(customer::Column::FullNameFolded)),
            TicketField::CustomerPhone => Some(qualified(customer::Column::PhoneFolded)),
            TicketField::CardNumber => Some(qualified(card::Column::CardNumberFolded)),
            _ => None,
        }
    }

    fn key() -> SimpleExpr {
        qualified(ticket::Column::Id)
    }
}

fn status_to_domain(status: ticket::TicketStatus) -> TicketStatus {
    match status {
        ticket::TicketStatus::Available => TicketStatus::Available,
        ticket::TicketStatus::Reserved => TicketStatus::Reserved,
        ticket::TicketStatus::Sold => TicketStatus::Sold,
        ticket::TicketStatus::Cancelled => TicketStatus::Cancelled,
    }
}

fn status_to_entity(status: TicketStatus) -> ticket::TicketStatus {
    match status {
        TicketStatus::Available => ticket::TicketStatus::Available,
        TicketStatus::Reserved => ticket::TicketStatus::Reserved,
        TicketStatus::Sold => ticket::TicketStatus::Sold,
        TicketStatus::Cancelled => ticket::TicketStatus::Cancelled,
    }
}

fn ticket_to_domain(model: ticket::Model, customer: Option<Customer>, card: Option<Card>) -> Ticket {
    Ticket {
        id: model.id,
        code: model.code,
        event_name: model.event_name,
        venue: model.venue,
        seat: model.seat,
        price: model.price,
        status: status_to_domain(model.status),
        customer_id: model.customer_id,
        card_id: model.card_id,
        created_time: model.created_time,
        modified_time: model.modified_time,
        customer,
        card,
    }
}

fn ticket_to_active(t: Ticket) -> ticket::ActiveModel {
    ticket::ActiveModel {
        id: Set(t.id),
        code_folded: Set(fold(&t.code)),
        event_name_folded: Set(fold(&t.event_name)),
        venue_folded: Set(fold_opt(&t.venue)),
        seat_folded: Set(fold_opt(&t.seat)),
        code: Set(t.code),
        event_name: Set(t.event_name),
        venue: Set(t.venue),
        seat: Set(t.seat),
        price: Set(t.price),
        status: Set(status_to_entity(t.status)),
        customer_id: Set(t.customer_id),
        card_id: Set(t.card_id),
        created_time: Set(t.created_time),
        modified_time: Set(t.modified_time),
    }
}

#[async_trait]
impl TableRepository<TicketTable> for SeaOrmTicketRepository {
    async fn fetch_page(
        &self,
        query: &TableQueryParameter<TicketField>,
    ) -> DomainResult<TableInfo<Ticket>> {
        let (models, total) = table::fetch_models::<TicketTable>(&self.db, query)
            .await
            .map_err(db_err)?;
        let items = self
            .materialize(models, query.includes("customer"), query.includes("card"))
            .await?;
        Ok(TableInfo::new(items, total, query.pager.size))
    }

    async fn find_one(&self, predicate: &Predicate<TicketField>) -> DomainResult<Option<Ticket>> {
        let Some(model) = table::find_first::<TicketTable>(&self.db, predicate)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };
        Ok(self.materialize(vec![model], true, true).await?.pop())
    }

    async fn exists(&self, predicate: &Predicate<TicketField>) -> DomainResult<bool> {
        table::any_match::<TicketTable>(&self.db, predicate)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl TicketRepository for SeaOrmTicketRepository {
    async fn insert(&self, ticket: Ticket) -> DomainResult<Ticket> {
        let model = ticket_to_active(ticket)
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        Ok(ticket_to_domain(model, None, None))
    }

    async fn update(&self, mut ticket: Ticket) -> DomainResult<Ticket> {
        ticket.modified_time = Utc::now();
        let model = ticket_to_active(ticket)
            .update(&self.db)
            .await
            .map_err(db_err)?;
        Ok(ticket_to_domain(model, None, None))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = ticket::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Ticket", id));
        }
        Ok(())
    }
}
