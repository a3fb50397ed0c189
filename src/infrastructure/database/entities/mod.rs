//! Database entities module

pub mod card;
pub mod customer;
pub mod permission;
pub mod role;
pub mod role_permission;
pub mod ticket;
pub mod user;
pub mod user_permission;

pub use card::Entity as Card;
pub use customer::Entity as Customer;
pub use permission::Entity as Permission;
pub use role::Entity as Role;
pub use role_permission::Entity as RolePermission;
pub use ticket::Entity as Ticket;
pub use user::Entity as User;
pub use user_permission::Entity as UserPermission;
