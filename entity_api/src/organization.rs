use super::error::Error;
use chrono::Utc;
use entity::{organizations::*, user_roles, Id};
use sea_orm::{
    entity::prelude::*, sea_query::Query, ActiveValue::Set, ConnectionTrait, QueryOrder,
};
use slugify::slugify;

use log::*;

pub async fn create(db: &impl ConnectionTrait, organization_model: Model) -> Result<Model, Error> {
    debug!("New Organization Model to be inserted: {organization_model:?}");

    let now = Utc::now();
    let name = organization_model.name;

    let organization_active_model: ActiveModel = ActiveModel {
        name: Set(name.clone()),
        slug: Set(slugify!(name.as_str())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(organization_active_model.insert(db).await?)
}

pub async fn find_all(db: &impl ConnectionTrait) -> Result<Vec<Model>, Error> {
    Ok(Entity::find().order_by_asc(Column::Name).all(db).await?)
}

/// Organizations in which `user_id` holds at least one role.
pub async fn find_by_user(db: &impl ConnectionTrait, user_id: Id) -> Result<Vec<Model>, Error> {
    let organizations = Entity::find()
        .filter(
            Column::Id.in_subquery(
                Query::select()
                    .column(user_roles::Column::OrganizationId)
                    .from(user_roles::Entity.table_ref())
                    .and_where(user_roles::Column::UserId.eq(user_id))
                    .to_owned(),
            ),
        )
        .order_by_asc(Column::Name)
        .all(db)
        .await?;

    Ok(organizations)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::organizations;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn organization(id: Id, name: &str) -> Model {
        let now = Utc::now();
        organizations::Model {
            id,
            name: name.to_owned(),
            slug: slugify!(name),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn find_all_returns_a_list_of_records_when_present() -> Result<(), Error> {
        let organizations = vec![vec![
            organization(1, "Organization One"),
            organization(2, "Organization Two"),
        ]];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(organizations.clone())
            .into_connection();

        assert_eq!(find_all(&db).await?, organizations[0]);

        Ok(())
    }

    #[tokio::test]
    async fn create_slugifies_the_name() -> Result<(), Error> {
        let saved = organization(3, "Acme Support");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[saved.clone()]])
            .into_connection();

        let created = create(&db, organization(0, "Acme Support")).await?;

        assert_eq!(created.slug, "acme-support");

        Ok(())
    }
}
