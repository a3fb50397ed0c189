//! Application layer: use-cases orchestrating the domain
//!
//! Services take a `RepositoryProvider` and never touch storage types.

pub mod access;
pub mod bootstrap;
pub mod identity;
pub mod sales;
pub mod table;

pub use access::{PermissionChecker, RoleService};
pub use bootstrap::{seed_access, SeedReport, ADMIN_ROLE};
pub use identity::UserService;
pub use sales::{CardService, CustomerService, TicketService};
pub use table::TableQueryBuilder;
