//! Ticket sales
//!
//! A reserved or sold ticket names its customer; a card used for the
//! sale must belong to that customer and be usable.

use std::sync::Arc;

use tracing::info;

use super::clean;
use crate::application::table::load_table;
use crate::domain::card::CardField;
use crate::domain::customer::CustomerField;
use crate::domain::table::{Predicate, TableInfo, TablePageParameter};
use crate::domain::ticket::{TicketField, TicketTable};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, Ticket, TicketStatus};

#[derive(Debug, Clone)]
pub struct TicketInput {
    pub code: String,
    pub event_name: String,
    pub venue: Option<String>,
    pub seat: Option<String>,
    /// Minor currency units
    pub price: i64,
    /// Defaults to `available` on create, unchanged on update
    pub status: Option<String>,
    pub customer_id: Option<String>,
    pub card_id: Option<String>,
}

pub struct TicketService {
    repos: Arc<dyn RepositoryProvider>,
}

impl TicketService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn table(&self, param: &TablePageParameter) -> DomainResult<TableInfo<Ticket>> {
        load_table::<TicketTable, _>(self.repos.tickets(), param).await
    }

    pub async fn get(&self, id: &str) -> DomainResult<Ticket> {
        self.repos
            .tickets()
            .find_one(&Predicate::equals(TicketField::Id, id))
            .await?
            .ok_or_else(|| DomainError::not_found("Ticket", id))
    }

    pub async fn create(&self, input: TicketInput) -> DomainResult<Ticket> {
        let status = match input.status.as_deref() {
            Some(raw) => Self::parse_status(raw)?,
            None => TicketStatus::Available,
        };

        let mut ticket = Ticket::new(
            input.code.trim(),
            input.event_name.trim(),
            input.price,
        );
        ticket.status = status;
        self.apply(&mut ticket, input).await?;

        let ticket = self.repos.tickets().insert(ticket).await?;
        info!(ticket_id = %ticket.id, code = %ticket.code, status = ticket.status.as_str(), "Ticket created");
        self.get(&ticket.id).await
    }

    pub async fn update(&self, id: &str, input: TicketInput) -> DomainResult<Ticket> {
        let mut ticket = self.get(id).await?;

        if let Some(raw) = input.status.as_deref() {
            let next = Self::parse_status(raw)?;
            if !ticket.status.can_transition_to(next) {
                return Err(DomainError::Validation(format!(
                    "Ticket cannot move from {} to {}",
                    ticket.status.as_str(),
                    next.as_str()
                )));
            }
            ticket.status = next;
        }
        ticket.code = input.code.trim().to_string();
        ticket.event_name = input.event_name.trim().to_string();
        ticket.price = input.price;
        self.apply(&mut ticket, input).await?;

        self.repos.tickets().update(ticket).await?;
        info!(ticket_id = id, "Ticket updated");
        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        let ticket = self.get(id).await?;
        self.repos.tickets().delete(&ticket.id).await?;
        info!(ticket_id = %ticket.id, code = %ticket.code, "Ticket deleted");
        Ok(())
    }

    /// Validate and copy the shared fields. `ticket.code`, `event_name`,
    /// `price` and `status` are already set.
    async fn apply(&self, ticket: &mut Ticket, input: TicketInput) -> DomainResult<()> {
        if ticket.code.is_empty() || ticket.code.len() > 64 {
            return Err(DomainError::Validation(
                "Ticket code must be 1-64 characters".into(),
            ));
        }
        if ticket.event_name.is_empty() {
            return Err(DomainError::Validation("Event name is required".into()));
        }
        if ticket.price < 0 {
            return Err(DomainError::Validation("Price cannot be negative".into()));
        }

        if let Some(existing) = self
            .repos
            .tickets()
            .find_one(&Predicate::equals(TicketField::Code, ticket.code.as_str()))
            .await?
        {
            if existing.id != ticket.id {
                return Err(DomainError::Conflict(format!(
                    "Ticket code '{}' already exists",
                    ticket.code
                )));
            }
        }

        let customer_id = clean(input.customer_id);
        let card_id = clean(input.card_id);

        if ticket.status.requires_customer() && customer_id.is_none() {
            return Err(DomainError::Validation(format!(
                "A {} ticket requires a customer",
                ticket.status.as_str()
            )));
        }

        if let Some(customer_id) = customer_id.as_deref() {
            let exists = self
                .repos
                .customers()
                .exists(&Predicate::equals(CustomerField::Id, customer_id))
                .await?;
            if !exists {
                return Err(DomainError::Validation(format!(
                    "Customer '{}' does not exist",
                    customer_id
                )));
            }
        }

        if let Some(card_id) = card_id.as_deref() {
            let Some(card) = self
                .repos
                .cards()
                .find_one(&Predicate::equals(CardField::Id, card_id))
                .await?
            else {
                return Err(DomainError::Validation(format!(
                    "Card '{}' does not exist",
                    card_id
                )));
            };
            if customer_id.as_deref() != Some(card.customer_id.as_str()) {
                return Err(DomainError::Validation(
                    "Card does not belong to the ticket's customer".into(),
                ));
            }
            if !card.is_usable() {
                return Err(DomainError::Validation(format!(
                    "Card '{}' is blocked or expired",
                    card.card_number
                )));
            }
        }

        ticket.venue = clean(input.venue);
        ticket.seat = clean(input.seat);
        ticket.customer_id = customer_id;
        ticket.card_id = card_id;
        Ok(())
    }

    fn parse_status(raw: &str) -> DomainResult<TicketStatus> {
        TicketStatus::from_str(raw)
            .ok_or_else(|| DomainError::Validation(format!("Unknown ticket status '{}'", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::SortDirection;
    use crate::domain::{Card, Customer};
    use crate::infrastructure::database::testing::memory_repositories;

    struct Fixture {
        svc: TicketService,
        customer: Customer,
        card: Card,
    }

    async fn fixture() -> Fixture {
        let repos = memory_repositories().await;
        let customer = repos
            .customers()
            .insert(Customer::new("Pham Van C"))
            .await
            .unwrap();
        let card = repos
            .cards()
            .insert(Card::new("C-7", "member", customer.id.clone()))
            .await
            .unwrap();
        Fixture {
            svc: TicketService::new(repos),
            customer,
            card,
        }
    }

    fn input(code: &str) -> TicketInput {
        TicketInput {
            code: code.into(),
            event_name: "Spring Concert".into(),
            venue: Some("Hanoi Opera House".into()),
            seat: None,
            price: 250_000,
            status: None,
            customer_id: None,
            card_id: None,
        }
    }

    #[tokio::test]
    async fn new_ticket_defaults_to_available() {
        let f = fixture().await;
        let ticket = f.svc.create(input("T-1")).await.unwrap();
        assert_eq!(ticket.status, TicketStatus::Available);
        assert!(ticket.customer.is_none());
    }

    #[tokio::test]
    async fn sold_ticket_needs_customer() {
        let f = fixture().await;
        let mut cmd = input("T-1");
        cmd.status = Some("sold".into());
        let err = f.svc.create(cmd).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn sale_with_card_loads_navigations() {
        let f = fixture().await;
        let mut cmd = input("T-1");
        cmd.status = Some("Sold".into());
        cmd.customer_id = Some(f.customer.id.clone());
        cmd.card_id = Some(f.card.id.clone());
        let ticket = f.svc.create(cmd).await.unwrap();

        assert_eq!(ticket.status, TicketStatus::Sold);
        assert_eq!(ticket.customer.map(|c| c.id), Some(f.customer.id));
        assert_eq!(ticket.card.map(|c| c.card_number), Some("C-7".into()));
    }

    #[tokio::test]
    async fn card_of_another_customer_is_rejected() {
        let f = fixture().await;
        let mut cmd = input("T-1");
        cmd.card_id = Some(f.card.id.clone());
        let err = f.svc.create(cmd).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_code_is_conflict() {
        let f = fixture().await;
        f.svc.create(input("T-1")).await.unwrap();
        let err = f.svc.create(input("T-1")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn cancelled_ticket_cannot_be_resold() {
        let f = fixture().await;
        let ticket = f.svc.create(input("T-1")).await.unwrap();

        let mut cancel = input("T-1");
        cancel.status = Some("cancelled".into());
        f.svc.update(&ticket.id, cancel).await.unwrap();

        let mut sell = input("T-1");
        sell.status = Some("sold".into());
        sell.customer_id = Some(f.customer.id.clone());
        let err = f.svc.update(&ticket.id, sell).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn table_pages_and_filters_by_customer_phone() {
        let f = fixture().await;
        for i in 0..25 {
            f.svc.create(input(&format!("T-{:02}", i))).await.unwrap();
        }

        let page = f
            .svc
            .table(
                &TablePageParameter::default()
                    .with_page(2, 10)
                    .with_sort("code", SortDirection::Ascending),
            )
            .await
            .unwrap();
        assert_eq!(page.total_items_count, 25);
        assert_eq!(page.page_count, 3);
        let codes: Vec<_> = page.items.iter().map(|t| t.code.as_str()).collect();
        assert_eq!(codes, vec!["T-20", "T-21", "T-22", "T-23", "T-24"]);

        let none = f
            .svc
            .table(&TablePageParameter::default().with_filter("phone", &["0900"]))
            .await
            .unwrap();
        assert_eq!(none.total_items_count, 0);
    }
}
