use crate::error::Error;
use crate::labels::{Column, Entity, Model};
use crate::{Id, IntoQueryFilterMap, QuerySort};
use entity_api::query;
use sea_orm::{DatabaseConnection, Order};

/// Labels matching `params`, by name unless the params ask for another order.
pub async fn find_by<P>(db: &DatabaseConnection, params: P) -> Result<Vec<Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<Column>,
{
    let sort = params.sort().or(Some((Column::Name, Order::Asc)));
    let labels =
        query::find_by_sorted::<Entity, Column>(db, params.into_query_filter_map(), sort).await?;

    Ok(labels)
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    organization_id: Id,
    id: Id,
) -> Result<Model, Error> {
    Ok(entity_api::label::find_by_id_in_organization(db, id, organization_id).await?)
}
