//! `SeaORM` Entity for a support case owned by an organization.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[schema(as = domain::cases::Model)]
#[sea_orm(schema_name = "casework", table_name = "cases")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    pub organization_id: Id,
    /// The partner currently handling this case, if any.
    pub assignee_id: Option<Id>,
    pub summary: String,
    #[schema(value_type = String, format = DateTime)]
    pub opened_on: DateTimeWithTimeZone,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub closed_on: Option<DateTimeWithTimeZone>,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Organizations,
    #[sea_orm(
        belongs_to = "super::partners::Entity",
        from = "Column::AssigneeId",
        to = "super::partners::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Partners,
    #[sea_orm(has_many = "super::actions::Entity")]
    Actions,
    #[sea_orm(has_many = "super::cases_labels::Entity")]
    CasesLabels,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl Related<super::partners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partners.def()
    }
}

impl Related<super::actions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Actions.def()
    }
}

impl Related<super::labels::Entity> for Entity {
    fn to() -> RelationDef {
        super::cases_labels::Relation::Labels.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::cases_labels::Relation::Cases.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
