use async_trait::async_trait;

use super::model::Ticket;
use super::table::TicketTable;
use crate::domain::table::TableRepository;
use crate::domain::DomainResult;

#[async_trait]
pub trait TicketRepository: TableRepository<TicketTable> {
    async fn insert(&self, ticket: Ticket) -> DomainResult<Ticket>;
    async fn update(&self, ticket: Ticket) -> DomainResult<Ticket>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
