use async_trait::async_trait;

use super::model::Card;
use super::table::CardTable;
use crate::domain::table::TableRepository;
use crate::domain::DomainResult;

#[async_trait]
pub trait CardRepository: TableRepository<CardTable> {
    async fn insert(&self, card: Card) -> DomainResult<Card>;
    async fn update(&self, card: Card) -> DomainResult<Card>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
