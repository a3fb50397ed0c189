//! User aggregate
//!
//! Contains the User entity, its table schema and repository interface.

pub mod model;
pub mod repository;
pub mod table;

pub use model::User;
pub use repository::UserRepository;
pub use table::{UserField, UserTable};
