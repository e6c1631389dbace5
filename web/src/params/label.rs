use sea_orm::{Order, Value};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::sort::SortOrder;
use domain::{labels, Id, IntoQueryFilterMap, QueryFilterMap, QuerySort};

/// Sortable fields for labels
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = "name")]
pub(crate) enum LabelSortField {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "created_at")]
    CreatedAt,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct IndexParams {
    #[serde(skip)]
    pub(crate) organization_id: Id,
    pub(crate) sort_by: Option<LabelSortField>,
    pub(crate) sort_order: Option<SortOrder>,
}

impl IndexParams {
    pub(crate) fn in_organization(mut self, organization_id: Id) -> Self {
        self.organization_id = organization_id;
        self
    }
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert(
            "organization_id".to_string(),
            Some(Value::Int(Some(self.organization_id))),
        );
        query_filter_map.insert("is_active".to_string(), Some(Value::Bool(Some(true))));

        query_filter_map
    }
}

impl QuerySort<labels::Column> for IndexParams {
    fn get_sort_column(&self) -> Option<labels::Column> {
        self.sort_by.as_ref().map(|field| match field {
            LabelSortField::Name => labels::Column::Name,
            LabelSortField::CreatedAt => labels::Column::CreatedAt,
        })
    }

    fn get_sort_order(&self) -> Option<Order> {
        self.sort_order.map(Order::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_on_organization_and_active_labels() {
        let params = IndexParams {
            organization_id: 0,
            sort_by: None,
            sort_order: None,
        }
        .in_organization(4);

        let query_filter_map = params.into_query_filter_map();

        assert_eq!(
            query_filter_map.get("organization_id"),
            Some(Value::Int(Some(4)))
        );
        assert_eq!(query_filter_map.get("is_active"), Some(Value::Bool(Some(true))));
    }

    #[test]
    fn sort_order_defaults_to_ascending() {
        let params = IndexParams {
            organization_id: 4,
            sort_by: Some(LabelSortField::CreatedAt),
            sort_order: None,
        };

        assert!(matches!(
            params.sort(),
            Some((labels::Column::CreatedAt, Order::Asc))
        ));
    }
}
