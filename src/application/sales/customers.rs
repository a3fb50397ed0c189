use std::sync::Arc;

use tracing::info;

use super::clean;
use crate::application::table::load_table;
use crate::domain::card::CardField;
use crate::domain::customer::{CustomerField, CustomerTable};
use crate::domain::table::{Predicate, TableInfo, TablePageParameter};
use crate::domain::ticket::TicketField;
use crate::domain::{Customer, DomainError, DomainResult, RepositoryProvider};

/// Fields accepted on create and full update
#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

pub struct CustomerService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CustomerService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn table(&self, param: &TablePageParameter) -> DomainResult<TableInfo<Customer>> {
        load_table::<CustomerTable, _>(self.repos.customers(), param).await
    }

    pub async fn get(&self, id: &str) -> DomainResult<Customer> {
        self.repos
            .customers()
            .find_one(&Predicate::equals(CustomerField::Id, id))
            .await?
            .ok_or_else(|| DomainError::not_found("Customer", id))
    }

    pub async fn create(&self, input: CustomerInput) -> DomainResult<Customer> {
        let mut customer = Customer::new(Self::full_name(&input.full_name)?);
        customer.phone = clean(input.phone);
        customer.email = clean(input.email);
        customer.address = clean(input.address);

        let customer = self.repos.customers().insert(customer).await?;
        info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    pub async fn update(&self, id: &str, input: CustomerInput) -> DomainResult<Customer> {
        let mut customer = self.get(id).await?;
        customer.full_name = Self::full_name(&input.full_name)?;
        customer.phone = clean(input.phone);
        customer.email = clean(input.email);
        customer.address = clean(input.address);

        let customer = self.repos.customers().update(customer).await?;
        info!(customer_id = %customer.id, "Customer updated");
        Ok(customer)
    }

    /// Customers holding cards or tickets cannot be deleted.
    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        let customer = self.get(id).await?;

        let has_cards = self
            .repos
            .cards()
            .exists(&Predicate::equals(CardField::CustomerId, customer.id.as_str()))
            .await?;
        let has_tickets = self
            .repos
            .tickets()
            .exists(&Predicate::equals(TicketField::CustomerId, customer.id.as_str()))
            .await?;
        if has_cards || has_tickets {
            return Err(DomainError::Conflict(format!(
                "Customer '{}' still has cards or tickets",
                customer.full_name
            )));
        }

        self.repos.customers().delete(&customer.id).await?;
        info!(customer_id = %customer.id, "Customer deleted");
        Ok(())
    }

    fn full_name(raw: &str) -> DomainResult<String> {
        let name = raw.trim();
        if name.is_empty() || name.len() > 200 {
            return Err(DomainError::Validation(
                "Full name must be 1-200 characters".into(),
            ));
        }
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::SortDirection;
    use crate::infrastructure::database::testing::memory_repositories;

    fn input(name: &str, address: Option<&str>) -> CustomerInput {
        CustomerInput {
            full_name: name.into(),
            phone: Some("  ".into()),
            email: None,
            address: address.map(String::from),
        }
    }

    #[tokio::test]
    async fn create_trims_and_drops_blank_fields() {
        let svc = CustomerService::new(memory_repositories().await);
        let customer = svc.create(input("  Tran Van A ", Some("Hanoi"))).await.unwrap();
        assert_eq!(customer.full_name, "Tran Van A");
        assert_eq!(customer.phone, None);
        assert_eq!(customer.address.as_deref(), Some("Hanoi"));
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let svc = CustomerService::new(memory_repositories().await);
        let err = svc.create(input("   ", None)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn address_filter_is_case_insensitive() {
        let svc = CustomerService::new(memory_repositories().await);
        svc.create(input("A", Some("12 Hanoi Street"))).await.unwrap();
        svc.create(input("B", Some("HANOI old quarter"))).await.unwrap();
        svc.create(input("C", Some("Da Nang"))).await.unwrap();

        let page = svc
            .table(
                &TablePageParameter::default()
                    .with_filter("Address", &["hanoi"])
                    .with_sort("full_name", SortDirection::Ascending),
            )
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|c| c.full_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(page.total_items_count, 2);
        assert_eq!(page.page_count, 1);
    }

    #[tokio::test]
    async fn filter_and_search_fold_vietnamese_text() {
        let svc = CustomerService::new(memory_repositories().await);
        svc.create(input("Nguyễn An", Some("HÀ NỘI"))).await.unwrap();
        svc.create(input("Trần Bình", Some("Hà Nội"))).await.unwrap();
        svc.create(input("Lê Cường", Some("Huế"))).await.unwrap();

        let page = svc
            .table(
                &TablePageParameter::default()
                    .with_filter("address", &["hà nội"])
                    .with_sort("fullname", SortDirection::Ascending),
            )
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|c| c.full_name.as_str()).collect();
        assert_eq!(names, vec!["Nguyễn An", "Trần Bình"]);

        let page = svc
            .table(&TablePageParameter::default().with_search("LÊ CƯỜNG"))
            .await
            .unwrap();
        assert_eq!(page.total_items_count, 1);
        assert_eq!(page.items[0].full_name, "Lê Cường");
    }

    #[tokio::test]
    async fn renamed_customer_matches_its_new_name() {
        let svc = CustomerService::new(memory_repositories().await);
        let created = svc.create(input("Old Name", None)).await.unwrap();
        svc.update(&created.id, input("Phạm Đức", None)).await.unwrap();

        let by_old = svc
            .table(&TablePageParameter::default().with_filter("fullname", &["old"]))
            .await
            .unwrap();
        assert_eq!(by_old.total_items_count, 0);

        let by_new = svc
            .table(&TablePageParameter::default().with_filter("fullname", &["ĐỨC"]))
            .await
            .unwrap();
        assert_eq!(by_new.total_items_count, 1);
    }

    #[tokio::test]
    async fn missing_customer_is_not_found() {
        let svc = CustomerService::new(memory_repositories().await);
        let err = svc.get("nope").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
