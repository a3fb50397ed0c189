//! HTTP REST API
//!
//! - `common`: response envelope, error mapping, table DTOs, validated JSON
//! - `middleware`: bearer authentication and per-route permission guards
//! - `modules`: handlers and DTOs per resource
//! - `router`: route table and OpenAPI document

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, ApiState};
