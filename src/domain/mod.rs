//! Domain layer: entities, the table query vocabulary and repository
//! interfaces. Free of storage and transport concerns.

pub mod card;
pub mod customer;
pub mod permission;
pub mod repositories;
pub mod role;
pub mod table;
pub mod ticket;
pub mod user;

pub use card::Card;
pub use customer::Customer;
pub use permission::{Permission, PermissionRegistry};
pub use repositories::{DomainResult, RepositoryProvider};
pub use role::Role;
pub use ticket::{Ticket, TicketStatus};
pub use user::User;

pub use crate::shared::errors::DomainError;
