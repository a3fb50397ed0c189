//! REST API modules, one per resource
//!
//! Each module keeps its DTOs and handlers side by side:
//! - `auth`: login, profile, password change
//! - `users`, `roles`: accounts and access control
//! - `customers`, `cards`, `tickets`: the sales back office
//! - `health`, `metrics`, `request_id`: operational endpoints and middleware

pub mod auth;
pub mod cards;
pub mod customers;
pub mod health;
pub mod metrics;
pub mod request_id;
pub mod roles;
pub mod tickets;
pub mod users;
