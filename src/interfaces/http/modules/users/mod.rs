//! Users module: the user table, CRUD and direct permission grants

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
