use crate::error::Error;
use crate::organizations::Model;
use crate::Id;
use sea_orm::DatabaseConnection;

pub use entity_api::organization::find_all;

pub async fn find_by_user(db: &DatabaseConnection, user_id: Id) -> Result<Vec<Model>, Error> {
    Ok(entity_api::organization::find_by_user(db, user_id).await?)
}
