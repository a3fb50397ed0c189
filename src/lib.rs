//! # Ticket Office
//!
//! Back office for ticket sales: accounts, roles and permissions,
//! customers, cards and tickets, served over a REST API whose list
//! endpoints share one dynamic table query (filter, search, sort, page).
//!
//! ## Architecture
//!
//! - **domain**: entities, the table query vocabulary, repository traits
//! - **application**: services, the query builder, permission checks
//! - **infrastructure**: SeaORM storage, migrations, JWT and bcrypt
//! - **interfaces**: axum REST API with Swagger documentation
//! - **shared**: domain errors and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::http::create_api_router;
