use crate::actions::Model;
use crate::error::Error;
use crate::Id;
use chrono::{DateTime, FixedOffset};
use sea_orm::DatabaseConnection;

pub use entity_api::action::{backfill_organization, create, BackfillSummary, BATCH_SIZE};

/// Actions of an organization, oldest first, optionally limited to those created
/// after `after`.
pub async fn find_by_organization(
    db: &DatabaseConnection,
    organization_id: Id,
    after: Option<DateTime<FixedOffset>>,
) -> Result<Vec<Model>, Error> {
    Ok(entity_api::action::find_by_organization(db, organization_id, after).await?)
}
