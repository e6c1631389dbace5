use super::error::Error;
use chrono::Utc;
use entity::profiles::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    ConnectionTrait,
};

pub async fn create(
    db: &impl ConnectionTrait,
    user_id: Id,
    full_name: String,
    change_password: bool,
) -> Result<Model, Error> {
    debug!("New Profile to be inserted for user {user_id}");

    let now = Utc::now();
    let active_model = ActiveModel {
        user_id: Set(user_id),
        full_name: Set(full_name),
        change_password: Set(change_password),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.insert(db).await?)
}

/// Overwrites the given profile fields, leaving `None` values as they are.
pub async fn update(
    db: &impl ConnectionTrait,
    profile: Model,
    full_name: Option<String>,
    change_password: Option<bool>,
) -> Result<Model, Error> {
    let active_model = ActiveModel {
        id: Unchanged(profile.id),
        user_id: Unchanged(profile.user_id),
        full_name: full_name.map_or(Unchanged(profile.full_name), Set),
        change_password: change_password.map_or(Unchanged(profile.change_password), Set),
        created_at: Unchanged(profile.created_at),
        updated_at: Set(Utc::now().into()),
    };

    Ok(active_model.update(db).await?)
}

pub async fn find_by_user_id(
    db: &impl ConnectionTrait,
    user_id: Id,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await?)
}
