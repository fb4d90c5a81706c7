pub use sea_orm_migration::prelude::*;

mod m20250310_000001_create_roles;
mod m20250310_000002_create_companies;
mod m20250310_000003_create_users;
mod m20250310_000004_create_banks;
mod m20250310_000005_create_cities;
mod m20250310_000006_create_airlines;
mod m20250310_000007_create_transports;
mod m20250310_000008_create_food;
mod m20250310_000009_create_rooms;
mod m20250310_000010_create_extra_services;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250310_000001_create_roles::Migration),
            Box::new(m20250310_000002_create_companies::Migration),
            Box::new(m20250310_000003_create_users::Migration),
            Box::new(m20250310_000004_create_banks::Migration),
            Box::new(m20250310_000005_create_cities::Migration),
            Box::new(m20250310_000006_create_airlines::Migration),
            Box::new(m20250310_000007_create_transports::Migration),
            Box::new(m20250310_000008_create_food::Migration),
            Box::new(m20250310_000009_create_rooms::Migration),
            Box::new(m20250310_000010_create_extra_services::Migration),
        ]
    }
}
