//! Tickets module: the ticket table and CRUD

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
