//! Role aggregate
//!
//! A role is a named set of permissions; each user holds at most one.

pub mod model;
pub mod repository;

pub use model::Role;
pub use repository::RoleRepository;
