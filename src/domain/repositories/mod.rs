//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::card::CardRepository;
use super::customer::CustomerRepository;
use super::permission::PermissionRepository;
use super::role::RoleRepository;
use super::ticket::TicketRepository;
use super::user::UserRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let role = repos.roles().find_by_name("Administrator").await?;
///     let page = repos.tickets().fetch_page(&query).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn roles(&self) -> &dyn RoleRepository;
    fn permissions(&self) -> &dyn PermissionRepository;
    fn customers(&self) -> &dyn CustomerRepository;
    fn cards(&self) -> &dyn CardRepository;
    fn tickets(&self) -> &dyn TicketRepository;
}
