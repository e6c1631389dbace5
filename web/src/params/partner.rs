use sea_orm::{Order, Value};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::sort::SortOrder;
use domain::{partners, Id, IntoQueryFilterMap, QueryFilterMap, QuerySort};

/// Sortable fields for partners
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = "name")]
pub(crate) enum PartnerSortField {
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
    pub(crate) sort_by: Option<PartnerSortField>,
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

impl QuerySort<partners::Column> for IndexParams {
    fn get_sort_column(&self) -> Option<partners::Column> {
        self.sort_by.as_ref().map(|field| match field {
            PartnerSortField::Name => partners::Column::Name,
            PartnerSortField::CreatedAt => partners::Column::CreatedAt,
        })
    }

    fn get_sort_order(&self) -> Option<Order> {
        self.sort_order.map(Order::from)
    }
}
