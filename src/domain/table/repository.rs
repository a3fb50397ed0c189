use async_trait::async_trait;

use super::info::TableInfo;
use super::predicate::Predicate;
use super::query::TableQueryParameter;
use super::schema::TableSchema;
use crate::domain::DomainResult;

/// Predicate-based retrieval, implemented once per listable entity.
#[async_trait]
pub trait TableRepository<S: TableSchema>: Send + Sync {
    /// Count matches, order, skip and take, then materialize the page.
    async fn fetch_page(
        &self,
        query: &TableQueryParameter<S::Field>,
    ) -> DomainResult<TableInfo<S::Row>>;

    /// First match with the schema's includes materialized.
    async fn find_one(&self, predicate: &Predicate<S::Field>) -> DomainResult<Option<S::Row>>;

    async fn exists(&self, predicate: &Predicate<S::Field>) -> DomainResult<bool>;
}
