use super::error::Error;
use chrono::Utc;
use entity::roles::Role;
use entity::user_roles::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

pub async fn find_by_user_id(db: &impl ConnectionTrait, user_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

/// Replaces every role `user_id` holds in `organization_id` with `roles`.
///
/// Duplicated roles are only stored once. Callers that need atomicity pass a
/// transaction as `db`.
pub async fn replace_in_organization(
    db: &impl ConnectionTrait,
    user_id: Id,
    organization_id: Id,
    roles: Vec<Role>,
) -> Result<Vec<Model>, Error> {
    Entity::delete_many()
        .filter(
            Condition::all()
                .add(Column::UserId.eq(user_id))
                .add(Column::OrganizationId.eq(organization_id)),
        )
        .exec(db)
        .await?;

    let mut unique_roles = roles;
    unique_roles.sort_by_key(|role| role.to_string());
    unique_roles.dedup();

    let now = Utc::now();
    let mut saved = Vec::with_capacity(unique_roles.len());
    for role in unique_roles {
        let active_model = ActiveModel {
            role: Set(role),
            organization_id: Set(organization_id),
            user_id: Set(user_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        saved.push(active_model.insert(db).await?);
    }

    debug!(
        "User {user_id} now holds {} role(s) in organization {organization_id}",
        saved.len()
    );
    Ok(saved)
}
