//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and written with the schema
//! builder, so the same migrator runs against Postgres and SQLite.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_organisations;
mod m20260301_000002_questionnaires;
mod m20260301_000003_prospects;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_organisations::Migration),
            Box::new(m20260301_000002_questionnaires::Migration),
            Box::new(m20260301_000003_prospects::Migration),
        ]
    }
}
