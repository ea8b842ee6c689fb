pub use sea_orm_migration::prelude::*;

mod m20260110_000001_create_lottery_types;
mod m20260110_000002_create_lottery_draws;
mod m20260110_000003_create_sync_status;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260110_000001_create_lottery_types::Migration),
            Box::new(m20260110_000002_create_lottery_draws::Migration),
            Box::new(m20260110_000003_create_sync_status::Migration),
        ]
    }
}
