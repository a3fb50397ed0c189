//! Identity module: user management and authentication
//!
//! `UserService` orchestrates login, password changes, the user table
//! and per-user permission grants.

pub mod service;

pub use service::{AuthResult, CreateUser, UpdateUser, UserProfile, UserService};
