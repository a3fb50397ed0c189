use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::application::table::load_table;
use crate::domain::card::{CardField, CardTable};
use crate::domain::customer::CustomerField;
use crate::domain::table::{Predicate, TableInfo, TablePageParameter};
use crate::domain::ticket::TicketField;
use crate::domain::{Card, DomainError, DomainResult, RepositoryProvider};

#[derive(Debug, Clone)]
pub struct CardInput {
    pub card_number: String,
    pub card_type: String,
    pub customer_id: String,
    /// Defaults to active on create, unchanged on update
    pub is_active: Option<bool>,
    pub expires_time: Option<DateTime<Utc>>,
}

pub struct CardService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CardService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn table(&self, param: &TablePageParameter) -> DomainResult<TableInfo<Card>> {
        load_table::<CardTable, _>(self.repos.cards(), param).await
    }

    pub async fn get(&self, id: &str) -> DomainResult<Card> {
        self.repos
            .cards()
            .find_one(&Predicate::equals(CardField::Id, id))
            .await?
            .ok_or_else(|| DomainError::not_found("Card", id))
    }

    pub async fn create(&self, input: CardInput) -> DomainResult<Card> {
        let (number, card_type) = Self::required(&input)?;
        self.ensure_number_free(&number, None).await?;
        self.ensure_customer(&input.customer_id).await?;

        let mut card = Card::new(number, card_type, input.customer_id.trim());
        card.is_active = input.is_active.unwrap_or(true);
        card.expires_time = input.expires_time;

        let card = self.repos.cards().insert(card).await?;
        info!(card_id = %card.id, customer_id = %card.customer_id, "Card issued");
        self.get(&card.id).await
    }

    pub async fn update(&self, id: &str, input: CardInput) -> DomainResult<Card> {
        let mut card = self.get(id).await?;
        let (number, card_type) = Self::required(&input)?;
        if number != card.card_number {
            self.ensure_number_free(&number, Some(&card.id)).await?;
        }
        let customer_id = input.customer_id.trim().to_string();
        if customer_id != card.customer_id {
            self.ensure_customer(&customer_id).await?;
        }

        card.card_number = number;
        card.card_type = card_type;
        card.customer_id = customer_id;
        if let Some(is_active) = input.is_active {
            card.is_active = is_active;
        }
        card.expires_time = input.expires_time;

        self.repos.cards().update(card).await?;
        info!(card_id = id, "Card updated");
        self.get(id).await
    }

    /// Cards referenced by tickets cannot be deleted.
    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        let card = self.get(id).await?;
        let used = self
            .repos
            .tickets()
            .exists(&Predicate::equals(TicketField::CardId, card.id.as_str()))
            .await?;
        if used {
            return Err(DomainError::Conflict(format!(
                "Card '{}' is referenced by tickets",
                card.card_number
            )));
        }

        self.repos.cards().delete(&card.id).await?;
        info!(card_id = %card.id, "Card deleted");
        Ok(())
    }

    fn required(input: &CardInput) -> DomainResult<(String, String)> {
        let number = input.card_number.trim();
        let card_type = input.card_type.trim();
        if number.is_empty() || number.len() > 64 {
            return Err(DomainError::Validation(
                "Card number must be 1-64 characters".into(),
            ));
        }
        if card_type.is_empty() {
            return Err(DomainError::Validation("Card type is required".into()));
        }
        Ok((number.to_string(), card_type.to_string()))
    }

    async fn ensure_number_free(&self, number: &str, except_id: Option<&str>) -> DomainResult<()> {
        let existing = self
            .repos
            .cards()
            .find_one(&Predicate::equals(CardField::CardNumber, number))
            .await?;
        match existing {
            Some(card) if Some(card.id.as_str()) != except_id => Err(DomainError::Conflict(
                format!("Card number '{}' is already issued", number),
            )),
            _ => Ok(()),
        }
    }

    async fn ensure_customer(&self, customer_id: &str) -> DomainResult<()> {
        let exists = self
            .repos
            .customers()
            .exists(&Predicate::equals(CustomerField::Id, customer_id.trim()))
            .await?;
        if !exists {
            return Err(DomainError::Validation(format!(
                "Customer '{}' does not exist",
                customer_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Customer;
    use crate::infrastructure::database::testing::memory_repositories;

    async fn setup() -> (CardService, Customer) {
        let repos = memory_repositories().await;
        let customer = repos
            .customers()
            .insert(Customer::new("Le Thi B"))
            .await
            .unwrap();
        (CardService::new(repos), customer)
    }

    fn input(number: &str, customer_id: &str) -> CardInput {
        CardInput {
            card_number: number.into(),
            card_type: "member".into(),
            customer_id: customer_id.into(),
            is_active: None,
            expires_time: None,
        }
    }

    #[tokio::test]
    async fn issued_card_includes_customer() {
        let (svc, customer) = setup().await;
        let card = svc.create(input(" C-100 ", &customer.id)).await.unwrap();
        assert_eq!(card.card_number, "C-100");
        assert!(card.is_active);
        assert_eq!(card.customer.map(|c| c.full_name), Some("Le Thi B".into()));
    }

    #[tokio::test]
    async fn unknown_customer_is_rejected() {
        let (svc, _) = setup().await;
        let err = svc.create(input("C-100", "missing")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_number_is_conflict() {
        let (svc, customer) = setup().await;
        svc.create(input("C-100", &customer.id)).await.unwrap();
        let err = svc.create(input("C-100", &customer.id)).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_keeping_own_number_is_allowed() {
        let (svc, customer) = setup().await;
        let card = svc.create(input("C-100", &customer.id)).await.unwrap();
        let mut change = input("C-100", &customer.id);
        change.card_type = "vip".into();
        change.is_active = Some(false);
        let updated = svc.update(&card.id, change).await.unwrap();
        assert_eq!(updated.card_type, "vip");
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn table_filters_on_customer_name() {
        let (svc, customer) = setup().await;
        svc.create(input("C-100", &customer.id)).await.unwrap();
        let page = svc
            .table(&TablePageParameter::default().with_filter("fullname", &["thi"]))
            .await
            .unwrap();
        assert_eq!(page.total_items_count, 1);

        let page = svc
            .table(&TablePageParameter::default().with_filter("fullname", &["nobody"]))
            .await
            .unwrap();
        assert_eq!(page.total_items_count, 0);
        assert_eq!(page.page_count, 0);
    }
}
