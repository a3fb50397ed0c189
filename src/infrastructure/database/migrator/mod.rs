//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_roles;
mod m20240101_000002_create_permissions;
mod m20240101_000003_create_role_permissions;
mod m20240101_000004_create_users;
mod m20240101_000005_create_user_permissions;
mod m20240101_000006_create_customers;
mod m20240101_000007_create_cards;
mod m20240101_000008_create_tickets;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_roles::Migration),
            Box::new(m20240101_000002_create_permissions::Migration),
            Box::new(m20240101_000003_create_role_permissions::Migration),
            Box::new(m20240101_000004_create_users::Migration),
            Box::new(m20240101_000005_create_user_permissions::Migration),
            Box::new(m20240101_000006_create_customers::Migration),
            Box::new(m20240101_000007_create_cards::Migration),
            Box::new(m20240101_000008_create_tickets::Migration),
        ]
    }
}
