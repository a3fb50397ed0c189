//! Sales back office: customers, their cards and the tickets sold to them.

pub mod cards;
pub mod customers;
pub mod tickets;

pub use cards::{CardInput, CardService};
pub use customers::{CustomerInput, CustomerService};
pub use tickets::{TicketInput, TicketService};

/// Trim and drop blank optional text
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
