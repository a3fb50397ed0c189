use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::sales::CardInput;
use crate::domain::Card;
use crate::interfaces::http::modules::customers::CustomerDto;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CardDto {
    pub id: String,
    pub card_number: String,
    pub card_type: String,
    pub customer_id: String,
    pub is_active: bool,
    /// Active and not expired
    pub is_usable: bool,
    pub expires_time: Option<DateTime<Utc>>,
    pub created_time: DateTime<Utc>,
    pub modified_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerDto>,
}

impl From<Card> for CardDto {
    fn from(c: Card) -> Self {
        Self {
            is_usable: c.is_usable(),
            id: c.id,
            card_number: c.card_number,
            card_type: c.card_type,
            customer_id: c.customer_id,
            is_active: c.is_active,
            expires_time: c.expires_time,
            created_time: c.created_time,
            modified_time: c.modified_time,
            customer: c.customer.map(CustomerDto::from),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "card_number": "MB-000123",
    "card_type": "member",
    "customer_id": "5d0c8a52-7a0e-4c36-9a8f-0b1f0e6c2a10",
    "is_active": true,
    "expires_time": "2027-12-31T23:59:59Z"
}))]
pub struct CardRequest {
    #[validate(length(min = 1, max = 64, message = "card_number must be 1-64 characters"))]
    pub card_number: String,
    #[validate(length(min = 1, max = 50, message = "card_type must be 1-50 characters"))]
    pub card_type: String,
    #[validate(length(min = 1, message = "customer_id is required"))]
    pub customer_id: String,
    /// Defaults to active on create, unchanged on update
    pub is_active: Option<bool>,
    pub expires_time: Option<DateTime<Utc>>,
}

impl From<CardRequest> for CardInput {
    fn from(r: CardRequest) -> Self {
        Self {
            card_number: r.card_number,
            card_type: r.card_type,
            customer_id: r.customer_id,
            is_active: r.is_active,
            expires_time: r.expires_time,
        }
    }
}
