use chrono::{DateTime, Utc};

use crate::domain::customer::Customer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub card_number: String,
    pub card_type: String,
    pub customer_id: String,
    pub is_active: bool,
    pub expires_time: Option<DateTime<Utc>>,
    pub created_time: DateTime<Utc>,
    pub modified_time: DateTime<Utc>,
    /// Loaded when the `customer` navigation is included
    pub customer: Option<Customer>,
}

impl Card {
    pub fn new(
        card_number: impl Into<String>,
        card_type: impl Into<String>,
        customer_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            card_number: card_number.into(),
            card_type: card_type.into(),
            customer_id: customer_id.into(),
            is_active: true,
            expires_time: None,
            created_time: now,
            modified_time: now,
            customer: None,
        }
    }

    /// Active and not past its expiry
    pub fn is_usable(&self) -> bool {
        self.is_active && self.expires_time.map_or(true, |t| t > Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_card_is_usable() {
        assert!(Card::new("C-001", "member", "cust-1").is_usable());
    }

    #[test]
    fn expired_card_is_not_usable() {
        let mut card = Card::new("C-001", "member", "cust-1");
        card.expires_time = Some(Utc::now() - Duration::days(1));
        assert!(!card.is_usable());
    }

    #[test]
    fn blocked_card_is_not_usable() {
        let mut card = Card::new("C-001", "member", "cust-1");
        card.is_active = false;
        assert!(!card.is_usable());
    }
}
