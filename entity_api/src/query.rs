use crate::{error::Error, QueryFilterMap};
use sea_orm::strum::IntoEnumIterator;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder};

/// Find all records of an entity by the given query filter map.
pub async fn find_by<E, C>(
    db: &impl ConnectionTrait,
    query_filter_map: QueryFilterMap,
) -> Result<Vec<E::Model>, Error>
where
    E: EntityTrait<Column = C>,
    C: ColumnTrait + IntoEnumIterator,
{
    find_by_sorted::<E, C>(db, query_filter_map, None).await
}

/// Find all records of an entity by the given query filter map, ordered by `sort`
/// when one is supplied.
pub async fn find_by_sorted<E, C>(
    db: &impl ConnectionTrait,
    query_filter_map: QueryFilterMap,
    sort: Option<(C, Order)>,
) -> Result<Vec<E::Model>, Error>
where
    E: EntityTrait<Column = C>,
    C: ColumnTrait + IntoEnumIterator,
{
    let mut query = E::find();

    // We iterate through the entity's defined columns so that we only attempt
    // to filter by columns that exist.
    for column in C::iter() {
        if let Some(value) = query_filter_map.get(&column.to_string()) {
            query = query.filter(column.eq(value));
        }
    }

    if let Some((column, order)) = sort {
        query = query.order_by(column, order);
    }

    Ok(query.all(db).await?)
}

/// Implemented by request parameter types that can describe how their results
/// should be ordered.
pub trait QuerySort<C: ColumnTrait> {
    fn get_sort_column(&self) -> Option<C>;
    fn get_sort_order(&self) -> Option<Order>;

    fn sort(&self) -> Option<(C, Order)> {
        match (self.get_sort_column(), self.get_sort_order()) {
            (Some(column), Some(order)) => Some((column, order)),
            (Some(column), None) => Some((column, Order::Asc)),
            _ => None,
        }
    }
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::labels;
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction, Value};

    #[tokio::test]
    async fn find_by_filters_only_on_known_columns() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<labels::Model>::new()])
            .into_connection();

        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert("organization_id".to_string(), Some(Value::Int(Some(7))));
        query_filter_map.insert("not_a_column".to_string(), Some(Value::Int(Some(3))));

        let _ = find_by::<labels::Entity, labels::Column>(&db, query_filter_map).await?;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "labels"."id", "labels"."organization_id", "labels"."name", "labels"."description", "labels"."is_active", "labels"."created_at", "labels"."updated_at" FROM "casework"."labels" WHERE "labels"."organization_id" = $1"#,
                [7i32.into()]
            )]
        );

        Ok(())
    }
}
