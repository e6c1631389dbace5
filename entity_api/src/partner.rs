use super::error::Error;
use chrono::Utc;
use entity::partners::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Set, ConnectionTrait};

pub async fn create(db: &impl ConnectionTrait, partner_model: Model) -> Result<Model, Error> {
    debug!("New Partner Model to be inserted: {partner_model:?}");

    let now = Utc::now();
    let active_model = ActiveModel {
        organization_id: Set(partner_model.organization_id),
        name: Set(partner_model.name),
        description: Set(partner_model.description),
        is_active: Set(partner_model.is_active),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.insert(db).await?)
}

/// Partners of another organization are reported as missing.
pub async fn find_by_id_in_organization(
    db: &impl ConnectionTrait,
    id: Id,
    organization_id: Id,
) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .filter(Column::OrganizationId.eq(organization_id))
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}
