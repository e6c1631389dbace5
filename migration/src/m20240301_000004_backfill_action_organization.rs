use entity_api::action::{backfill_organization, BATCH_SIZE};
use log::info;
use sea_orm_migration::prelude::*;

/// Copies each case's organization onto the case's actions. No schema change.
///
/// On PostgreSQL the migrator runs `up` inside a single transaction, so each batch
/// only commits when the whole migration does and a failing batch rolls back every
/// batch before it. To commit batch by batch on a large table, run the
/// `backfill_action_org` binary before migrating; this migration then rewrites the
/// same values.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let summary = backfill_organization(
            manager.get_connection(),
            BATCH_SIZE,
            |processed, total| info!("Updated {processed} cases of {total}"),
        )
        .await
        .map_err(|err| DbErr::Migration(err.to_string()))?;

        info!(
            "Backfilled action organizations for {} cases in {} batches",
            summary.processed_cases, summary.batches
        );

        Ok(())
    }

    // Nothing to undo: the organization was unset or stale before.
    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        Ok(())
    }
}
