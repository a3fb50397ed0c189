//! Ticket DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::sales::TicketInput;
use crate::domain::{Card, Customer, Ticket};

/// Owner as shown on a ticket row
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketCustomerDto {
    pub id: String,
    pub full_name: String,
    pub phone: Option<String>,
}

impl From<Customer> for TicketCustomerDto {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            full_name: c.full_name,
            phone: c.phone,
        }
    }
}

/// Card used for the sale
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketCardDto {
    pub id: String,
    pub card_number: String,
    pub card_type: String,
}

impl From<Card> for TicketCardDto {
    fn from(c: Card) -> Self {
        Self {
            id: c.id,
            card_number: c.card_number,
            card_type: c.card_type,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketDto {
    pub id: String,
    pub code: String,
    pub event_name: String,
    pub venue: Option<String>,
    pub seat: Option<String>,
    /// Minor currency units
    pub price: i64,
    /// `available`, `reserved`, `sold` or `cancelled`
    pub status: String,
    pub customer_id: Option<String>,
    pub card_id: Option<String>,
    pub created_time: DateTime<Utc>,
    pub modified_time: DateTime<Utc>,
    pub customer: Option<TicketCustomerDto>,
    pub card: Option<TicketCardDto>,
}

impl From<Ticket> for TicketDto {
    fn from(t: Ticket) -> Self {
        Self {
            id: t.id,
            code: t.code,
            event_name: t.event_name,
            venue: t.venue,
            seat: t.seat,
            price: t.price,
            status: t.status.as_str().to_string(),
            customer_id: t.customer_id,
            card_id: t.card_id,
            created_time: t.created_time,
            modified_time: t.modified_time,
            customer: t.customer.map(TicketCustomerDto::from),
            card: t.card.map(TicketCardDto::from),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "code": "RCK-2026-A12",
    "event_name": "Rock Night",
    "venue": "My Dinh Stadium",
    "seat": "A12",
    "price": 450000,
    "status": "sold",
    "customer_id": "5d0c8a52-7a0e-4c36-9a8f-0b1f0e6c2a10",
    "card_id": null
}))]
pub struct TicketRequest {
    #[validate(length(min = 1, max = 64, message = "code must be 1-64 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 200, message = "event_name must be 1-200 characters"))]
    pub event_name: String,
    #[validate(length(max = 200))]
    pub venue: Option<String>,
    #[validate(length(max = 32))]
    pub seat: Option<String>,
    #[validate(range(min = 0, message = "price cannot be negative"))]
    pub price: i64,
    /// Defaults to `available` on create, unchanged on update
    pub status: Option<String>,
    pub customer_id: Option<String>,
    pub card_id: Option<String>,
}

impl From<TicketRequest> for TicketInput {
    fn from(r: TicketRequest) -> Self {
        Self {
            code: r.code,
            event_name: r.event_name,
            venue: r.venue,
            seat: r.seat,
            price: r.price,
            status: r.status,
            customer_id: r.customer_id,
            card_id: r.card_id,
        }
    }
}
