use async_trait::async_trait;

use super::model::Customer;
use super::table::CustomerTable;
use crate::domain::table::TableRepository;
use crate::domain::DomainResult;

#[async_trait]
pub trait CustomerRepository: TableRepository<CustomerTable> {
    async fn insert(&self, customer: Customer) -> DomainResult<Customer>;
    async fn update(&self, customer: Customer) -> DomainResult<Customer>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
