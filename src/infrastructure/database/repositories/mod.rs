//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod card_repository;
pub mod customer_repository;
pub mod permission_repository;
pub mod repository_provider;
pub mod role_repository;
pub mod ticket_repository;
pub mod user_repository;

pub use permission_repository::{SeaOrmPermissionRepository, SeaOrmPermissionStore};
pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::{DbErr, SqlErr};

use crate::shared::errors::{DomainError, InfraError};

/// Constraint violations become conflicts; everything else is a storage
/// failure.
pub(crate) fn db_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => DomainError::Conflict(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
            DomainError::Conflict(format!("Record is still referenced: {}", msg))
        }
        _ => InfraError::Database(e).into(),
    }
}
