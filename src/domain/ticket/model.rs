//! Ticket domain model

use chrono::{DateTime, Utc};

use crate::domain::card::Card;
use crate::domain::customer::Customer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Available,
    Reserved,
    Sold,
    Cancelled,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Sold => "sold",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "available" => Some(Self::Available),
            "reserved" => Some(Self::Reserved),
            "sold" => Some(Self::Sold),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Cancelled tickets are final; everything else may move freely.
    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        !matches!(self, Self::Cancelled) || next == Self::Cancelled
    }

    /// Reserved and sold tickets must name the customer they belong to.
    pub fn requires_customer(&self) -> bool {
        matches!(self, Self::Reserved | Self::Sold)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: String,
    pub code: String,
    pub event_name: String,
    pub venue: Option<String>,
    pub seat: Option<String>,
    /// Minor currency units
    pub price: i64,
    pub status: TicketStatus,
    pub customer_id: Option<String>,
    pub card_id: Option<String>,
    pub created_time: DateTime<Utc>,
    pub modified_time: DateTime<Utc>,
    /// Loaded when the `customer` navigation is included
    pub customer: Option<Customer>,
    /// Loaded when the `card` navigation is included
    pub card: Option<Card>,
}

impl Ticket {
    pub fn new(code: impl Into<String>, event_name: impl Into<String>, price: i64) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            code: code.into(),
            event_name: event_name.into(),
            venue: None,
            seat: None,
            price,
            status: TicketStatus::Available,
            customer_id: None,
            card_id: None,
            created_time: now,
            modified_time: now,
            customer: None,
            card: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(TicketStatus::from_str("SOLD"), Some(TicketStatus::Sold));
        assert_eq!(TicketStatus::from_str(" reserved "), Some(TicketStatus::Reserved));
        assert_eq!(TicketStatus::from_str("lost"), None);
    }

    #[test]
    fn status_names_parse_back() {
        for status in [
            TicketStatus::Available,
            TicketStatus::Reserved,
            TicketStatus::Sold,
            TicketStatus::Cancelled,
        ] {
            assert_eq!(TicketStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn cancelled_is_final() {
        assert!(!TicketStatus::Cancelled.can_transition_to(TicketStatus::Sold));
        assert!(TicketStatus::Cancelled.can_transition_to(TicketStatus::Cancelled));
        assert!(TicketStatus::Sold.can_transition_to(TicketStatus::Available));
    }

    #[test]
    fn new_ticket_is_available_without_customer() {
        let ticket = Ticket::new("T-1", "Concert", 150_000);
        assert_eq!(ticket.status, TicketStatus::Available);
        assert!(ticket.customer_id.is_none());
        assert!(!ticket.status.requires_customer());
    }
}
