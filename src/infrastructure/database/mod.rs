pub mod entities;
pub mod migrator;
pub mod repositories;
pub mod table;

#[cfg(test)]
pub mod testing;

pub use repositories::{SeaOrmPermissionStore, SeaOrmRepositoryProvider};

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::DatabaseSection;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./ticket-office.db?mode=rwc")
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_section(section: &DatabaseSection) -> Self {
        Self {
            url: section.url.clone(),
            max_connections: section.pool.max_connections,
            min_connections: section.pool.min_connections,
            connect_timeout: Duration::from_secs(section.pool.connect_timeout_secs),
            idle_timeout: Duration::from_secs(section.pool.idle_timeout_secs),
        }
    }

    /// Create config for a SQLite file
    pub fn sqlite(path: &str) -> Self {
        let mut section = DatabaseSection::default();
        section.url = format!("sqlite://{}?mode=rwc", path);
        Self::from_section(&section)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::from_section(&DatabaseSection::default())
    }
}

/// Initialize the connection pool
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!("Database connected successfully");
    Ok(db)
}
