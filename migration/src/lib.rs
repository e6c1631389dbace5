pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_schema;
mod m20240301_000002_create_base_tables;
mod m20240301_000003_add_initial_superuser;
mod m20240301_000004_backfill_action_organization;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_schema::Migration),
            Box::new(m20240301_000002_create_base_tables::Migration),
            Box::new(m20240301_000003_add_initial_superuser::Migration),
            Box::new(m20240301_000004_backfill_action_organization::Migration),
        ]
    }
}
