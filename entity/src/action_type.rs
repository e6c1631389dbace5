use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The kind of event an action records against its case.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    EnumIter,
    Deserialize,
    Serialize,
    DeriveActiveEnum,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "action_type")]
pub enum ActionType {
    #[sea_orm(string_value = "open")]
    #[default]
    Open,
    #[sea_orm(string_value = "add_note")]
    AddNote,
    #[sea_orm(string_value = "reassign")]
    Reassign,
    #[sea_orm(string_value = "label")]
    Label,
    #[sea_orm(string_value = "unlabel")]
    Unlabel,
    #[sea_orm(string_value = "close")]
    Close,
    #[sea_orm(string_value = "reopen")]
    Reopen,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::AddNote => write!(f, "add_note"),
            Self::Reassign => write!(f, "reassign"),
            Self::Label => write!(f, "label"),
            Self::Unlabel => write!(f, "unlabel"),
            Self::Close => write!(f, "close"),
            Self::Reopen => write!(f, "reopen"),
        }
    }
}
