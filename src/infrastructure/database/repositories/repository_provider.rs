//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::card::CardRepository;
use crate::domain::customer::CustomerRepository;
use crate::domain::permission::PermissionRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::role::RoleRepository;
use crate::domain::ticket::TicketRepository;
use crate::domain::user::UserRepository;

use super::card_repository::SeaOrmCardRepository;
use super::customer_repository::SeaOrmCustomerRepository;
use super::permission_repository::SeaOrmPermissionRepository;
use super::role_repository::SeaOrmRoleRepository;
use super::ticket_repository::SeaOrmTicketRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let page = repos.tickets().fetch_page(&query).await?;
/// let role = repos.roles().find_by_name("Administrator").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    roles: SeaOrmRoleRepository,
    permissions: SeaOrmPermissionRepository,
    customers: SeaOrmCustomerRepository,
    cards: SeaOrmCardRepository,
    tickets: SeaOrmTicketRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            roles: SeaOrmRoleRepository::new(db.clone()),
            permissions: SeaOrmPermissionRepository::new(db.clone()),
            customers: SeaOrmCustomerRepository::new(db.clone()),
            cards: SeaOrmCardRepository::new(db.clone()),
            tickets: SeaOrmTicketRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn roles(&self) -> &dyn RoleRepository {
        &self.roles
    }

    fn permissions(&self) -> &dyn PermissionRepository {
        &self.permissions
    }

    fn customers(&self) -> &dyn CustomerRepository {
        &self.customers
    }

    fn cards(&self) -> &dyn CardRepository {
        &self.cards
    }

    fn tickets(&self) -> &dyn TicketRepository {
        &self.tickets
    }
}
