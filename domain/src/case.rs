use crate::error::Error;
use crate::Id;
use sea_orm::DatabaseConnection;

pub use entity_api::case::{create, CaseWithLabels};

pub async fn find_by_organization(
    db: &DatabaseConnection,
    organization_id: Id,
) -> Result<Vec<CaseWithLabels>, Error> {
    Ok(entity_api::case::find_by_organization(db, organization_id).await?)
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    organization_id: Id,
    id: Id,
) -> Result<CaseWithLabels, Error> {
    Ok(entity_api::case::find_by_id_in_organization(db, id, organization_id).await?)
}
