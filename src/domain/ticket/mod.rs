//! Ticket aggregate

pub mod model;
pub mod repository;
pub mod table;

pub use model::{Ticket, TicketStatus};
pub use repository::TicketRepository;
pub use table::{TicketField, TicketTable};
