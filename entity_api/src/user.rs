use super::error::{EntityApiErrorKind, Error};
use super::{profile, user_role};
use async_trait::async_trait;
use axum_login::{AuthnBackend, UserId};
use chrono::Utc;

use entity::users::{ActiveModel, Column, Entity, Model};
use entity::{profiles, roles::Role, user_roles, Id, RESERVED_USER_ID};
use log::*;
use password_auth;
use sea_orm::{
    entity::prelude::*, sea_query::Query, ActiveValue::Unchanged, ConnectionTrait,
    DatabaseConnection, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// A user together with their (optional) profile sub-record.
pub type UserWithProfile = (Model, Option<profiles::Model>);

/// Everything needed to insert a user, their profile and their organization roles.
#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub email: String,
    /// Plaintext password; hashed before it is stored.
    pub password: String,
    pub full_name: String,
    pub change_password: bool,
}

/// Changes to apply to an existing user. `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub full_name: Option<String>,
    /// Plaintext password; hashed before it is stored.
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub change_password: Option<bool>,
    /// Replaces the user's roles within the given organization.
    pub roles: Option<(Id, Vec<Role>)>,
}

pub async fn create(
    db: &impl ConnectionTrait,
    email: String,
    password: String,
) -> Result<Model, Error> {
    debug!("New User to be inserted with email: {email}");

    let now = Utc::now();
    let user_active_model: ActiveModel = ActiveModel {
        email: Set(email),
        password: Set(generate_hash(password)),
        is_active: Set(true),
        is_superuser: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    let mut created_user = user_active_model.insert(db).await?;

    // Newly created users will not have roles at this point so we will add an empty vec manually
    created_user.roles = Vec::new();
    Ok(created_user)
}

/// Inserts a user, their profile and, when an organization is given, one role row
/// per requested role. All rows are written in a single transaction.
pub async fn create_with_profile(
    db: &impl TransactionTrait,
    organization_id: Option<Id>,
    roles: Vec<Role>,
    new_user: NewUser,
) -> Result<(Model, profiles::Model), Error> {
    let txn = db.begin().await?;

    let mut user = create(&txn, new_user.email, new_user.password).await?;
    let profile = profile::create(
        &txn,
        user.id,
        new_user.full_name,
        new_user.change_password,
    )
    .await?;

    if let Some(organization_id) = organization_id {
        user.roles =
            user_role::replace_in_organization(&txn, user.id, organization_id, roles).await?;
    }

    txn.commit().await?;

    info!("Created user {} ({})", user.id, user.email);
    Ok((user, profile))
}

/// Applies `changes` to the user identified by `user_id` in a single transaction.
pub async fn update(
    db: &impl TransactionTrait,
    user_id: Id,
    changes: UserChanges,
) -> Result<(Model, Option<profiles::Model>), Error> {
    let txn = db.begin().await?;

    let existing = Entity::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or_else(Error::not_found)?;

    let active_model = ActiveModel {
        id: Unchanged(existing.id),
        email: changes.email.map_or(Unchanged(existing.email), Set),
        password: changes
            .password
            .map_or(Unchanged(existing.password), |password| {
                Set(generate_hash(password))
            }),
        is_active: changes.is_active.map_or(Unchanged(existing.is_active), Set),
        is_superuser: Unchanged(existing.is_superuser),
        created_at: Unchanged(existing.created_at),
        updated_at: Set(Utc::now().into()),
    };
    let mut user = active_model.update(&txn).await?;

    let profile = match profile::find_by_user_id(&txn, user_id).await? {
        Some(existing_profile) => Some(
            profile::update(
                &txn,
                existing_profile,
                changes.full_name,
                changes.change_password,
            )
            .await?,
        ),
        None => match changes.full_name {
            Some(full_name) => Some(
                profile::create(
                    &txn,
                    user_id,
                    full_name,
                    changes.change_password.unwrap_or(false),
                )
                .await?,
            ),
            None => None,
        },
    };

    user.roles = match changes.roles {
        Some((organization_id, roles)) => {
            user_role::replace_in_organization(&txn, user_id, organization_id, roles).await?
        }
        None => user_role::find_by_user_id(&txn, user_id).await?,
    };

    txn.commit().await?;

    debug!("Updated user {user_id}");
    Ok((user, profile))
}

pub async fn find_by_email(db: &impl ConnectionTrait, email: &str) -> Result<Option<Model>, Error> {
    let results = Entity::find()
        .filter(Column::Email.eq(email))
        .find_with_related(user_roles::Entity)
        .all(db)
        .await?;
    match results.into_iter().next() {
        Some((mut user, roles)) => {
            user.roles = roles;
            Ok(Some(user))
        }
        None => Ok(None),
    }
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let results = Entity::find_by_id(id)
        .find_with_related(user_roles::Entity)
        .all(db)
        .await?;

    match results.into_iter().next() {
        Some((mut user, roles)) => {
            user.roles = roles;
            Ok(user)
        }
        None => Err(Error::not_found()),
    }
}

/// Finds an active user holding at least one of `roles` in `organization_id`.
///
/// Without an organization the lookup is only restricted to active users.
pub async fn find_active_with_roles(
    db: &impl ConnectionTrait,
    id: Id,
    organization_id: Option<Id>,
    roles: &[Role],
) -> Result<Option<UserWithProfile>, Error> {
    let mut query = Entity::find_by_id(id)
        .find_also_related(profiles::Entity)
        .filter(Column::IsActive.eq(true));

    if let Some(organization_id) = organization_id {
        query = query.filter(Column::Id.in_subquery(members_of(organization_id, roles)));
    }

    Ok(query.one(db).await?)
}

/// Lists active users, excluding the reserved system user, ordered by full name.
///
/// With an organization the listing is further restricted to users holding any role
/// (admin, editor or viewer) in that organization.
pub async fn find_active_listing(
    db: &impl ConnectionTrait,
    organization_id: Option<Id>,
) -> Result<Vec<UserWithProfile>, Error> {
    let mut query = Entity::find()
        .find_also_related(profiles::Entity)
        .filter(Column::IsActive.eq(true))
        .filter(Column::Id.gt(RESERVED_USER_ID));

    if let Some(organization_id) = organization_id {
        query = query.filter(Column::Id.in_subquery(members_of(
            organization_id,
            &[Role::Admin, Role::Editor, Role::Viewer],
        )));
    }

    Ok(query
        .order_by_asc(profiles::Column::FullName)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

fn members_of(organization_id: Id, roles: &[Role]) -> sea_orm::sea_query::SelectStatement {
    Query::select()
        .column(user_roles::Column::UserId)
        .from(user_roles::Entity.table_ref())
        .and_where(user_roles::Column::OrganizationId.eq(organization_id))
        .and_where(user_roles::Column::Role.is_in(roles.iter().copied()))
        .to_owned()
}

pub fn generate_hash(password: String) -> String {
    password_auth::generate_hash(password)
}

async fn authenticate_user(creds: Credentials, user: Model) -> Result<Option<Model>, Error> {
    if !user.is_active {
        warn!("Inactive user {} attempted to log in", user.id);
        return Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordUnauthenticated,
        });
    }

    match password_auth::verify_password(creds.password, &user.password) {
        Ok(_) => Ok(Some(user)),
        Err(_) => Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordUnauthenticated,
        }),
    }
}

#[derive(Debug, Clone)]
pub struct Backend {
    db: Arc<DatabaseConnection>,
}

#[derive(Debug, Clone, ToSchema, IntoParams, Deserialize)]
#[schema(as = domain::user::Credentials)] // OpenAPI schema
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

impl Backend {
    pub fn new(db: &Arc<DatabaseConnection>) -> Self {
        Self {
            // Arc is cloned, but the source DatabaseConnection refers to the same instance
            // as the one passed in to new() (see the Arc documentation for more info)
            db: Arc::clone(db),
        }
    }
}

#[async_trait]
impl AuthnBackend for Backend {
    type User = Model;
    type Credentials = Credentials;
    type Error = Error;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        match find_by_email(self.db.as_ref(), &creds.email).await? {
            Some(user) => authenticate_user(creds, user).await,
            None => Err(Error {
                source: None,
                error_kind: EntityApiErrorKind::RecordUnauthenticated,
            }),
        }
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        let results = Entity::find_by_id(*user_id)
            .find_with_related(user_roles::Entity)
            .all(self.db.as_ref())
            .await?;
        match results.into_iter().next() {
            Some((mut user, roles)) => {
                user.roles = roles;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}

pub type AuthSession = axum_login::AuthSession<Backend>;

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod test {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};

    fn user_model(id: Id, email: &str) -> Model {
        let now = Utc::now();
        Model {
            id,
            email: email.to_owned(),
            password: generate_hash("password123".to_owned()),
            is_active: true,
            is_superuser: false,
            created_at: now.into(),
            updated_at: now.into(),
            roles: vec![],
        }
    }

    fn profile_model(
        id: Id,
        user_id: Id,
        full_name: &str,
        change_password: bool,
    ) -> profiles::Model {
        let now = Utc::now();
        profiles::Model {
            id,
            user_id,
            full_name: full_name.to_owned(),
            change_password,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn role_model(id: Id, user_id: Id, organization_id: Id, role: Role) -> user_roles::Model {
        let now = Utc::now();
        user_roles::Model {
            id,
            role,
            organization_id,
            user_id,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn find_by_email_returns_a_single_record() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let user_email = "test@test.com";
        let _ = find_by_email(&db, user_email).await;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "users"."id" AS "A_id", "users"."email" AS "A_email", "users"."password" AS "A_password", "users"."is_active" AS "A_is_active", "users"."is_superuser" AS "A_is_superuser", "users"."created_at" AS "A_created_at", "users"."updated_at" AS "A_updated_at", "user_roles"."id" AS "B_id", CAST("user_roles"."role" AS "text") AS "B_role", "user_roles"."organization_id" AS "B_organization_id", "user_roles"."user_id" AS "B_user_id", "user_roles"."created_at" AS "B_created_at", "user_roles"."updated_at" AS "B_updated_at" FROM "casework"."users" LEFT JOIN "casework"."user_roles" ON "users"."id" = "user_roles"."user_id" WHERE "users"."email" = $1 ORDER BY "users"."id" ASC"#,
                [user_email.into()]
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_populates_roles() -> Result<(), Error> {
        let user = user_model(5, "editor@example.com");
        let role = role_model(1, 5, 10, Role::Editor);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[(user.clone(), Some(role.clone()))]])
            .into_connection();

        let found = find_by_id(&db, 5).await?;

        assert_eq!(found.id, 5);
        assert_eq!(found.roles, vec![role]);

        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_returns_not_found_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<(Model, Option<user_roles::Model>)>::new()])
            .into_connection();

        let result = find_by_id(&db, 42).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn create_with_profile_inserts_user_profile_and_roles() -> Result<(), Error> {
        let user = user_model(7, "new@example.com");
        let profile = profile_model(3, 7, "New Person", true);
        let editor = role_model(11, 7, 2, Role::Editor);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user.clone()]])
            .append_query_results([[profile.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([[editor.clone()]])
            .into_connection();

        let (created, created_profile) = create_with_profile(
            &db,
            Some(2),
            vec![Role::Editor],
            NewUser {
                email: "new@example.com".to_owned(),
                password: "password123".to_owned(),
                full_name: "New Person".to_owned(),
                change_password: true,
            },
        )
        .await?;

        assert_eq!(created.id, 7);
        assert_eq!(created.roles, vec![editor]);
        assert_eq!(created_profile.full_name, "New Person");
        assert!(created_profile.change_password);

        Ok(())
    }

    #[tokio::test]
    async fn create_with_profile_without_organization_skips_roles() -> Result<(), Error> {
        let user = user_model(8, "solo@example.com");
        let profile = profile_model(4, 8, "Solo", false);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user.clone()]])
            .append_query_results([[profile.clone()]])
            .into_connection();

        let (created, _) = create_with_profile(
            &db,
            None,
            vec![Role::Admin],
            NewUser {
                email: "solo@example.com".to_owned(),
                password: "password123".to_owned(),
                full_name: "Solo".to_owned(),
                change_password: false,
            },
        )
        .await?;

        assert!(created.roles.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn create_with_profile_returns_error_on_duplicate_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([sea_orm::DbErr::Custom("Duplicate email".to_string())])
            .into_connection();

        let result = create_with_profile(
            &db,
            Some(1),
            vec![Role::Editor],
            NewUser {
                email: "dupe@example.com".to_owned(),
                password: "password123".to_owned(),
                full_name: "Dupe".to_owned(),
                change_password: false,
            },
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn update_returns_not_found_for_missing_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let result = update(&db, 99, UserChanges::default()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn update_changes_profile_and_reloads_roles() -> Result<(), Error> {
        let user = user_model(5, "person@example.com");
        let updated_user = Model {
            email: "renamed@example.com".to_owned(),
            ..user.clone()
        };
        let profile = profile_model(2, 5, "Old Name", true);
        let updated_profile = profiles::Model {
            full_name: "New Name".to_owned(),
            change_password: false,
            ..profile.clone()
        };
        let role = role_model(9, 5, 3, Role::Viewer);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user.clone()]])
            .append_query_results([[updated_user.clone()]])
            .append_query_results([[profile.clone()]])
            .append_query_results([[updated_profile.clone()]])
            .append_query_results([[role.clone()]])
            .into_connection();

        let (saved, saved_profile) = update(
            &db,
            5,
            UserChanges {
                email: Some("renamed@example.com".to_owned()),
                full_name: Some("New Name".to_owned()),
                change_password: Some(false),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(saved.email, "renamed@example.com");
        assert_eq!(saved.roles, vec![role]);
        let saved_profile = saved_profile.expect("profile should be present");
        assert_eq!(saved_profile.full_name, "New Name");
        assert!(!saved_profile.change_password);

        Ok(())
    }

    #[tokio::test]
    async fn find_active_listing_returns_users_with_profiles() -> Result<(), Error> {
        let alice = user_model(2, "alice@example.com");
        let bob = user_model(3, "bob@example.com");
        let alice_profile = profile_model(1, 2, "Alice", false);
        let bob_profile = profile_model(2, 3, "Bob", false);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                (alice.clone(), Some(alice_profile.clone())),
                (bob.clone(), Some(bob_profile.clone())),
            ]])
            .into_connection();

        let listing = find_active_listing(&db, Some(1)).await?;

        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].0.id, 2);
        assert_eq!(listing[1].1.as_ref().map(|p| p.full_name.as_str()), Some("Bob"));

        Ok(())
    }

    fn logged_statement(db: sea_orm::DatabaseConnection) -> sea_orm::Statement {
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        log[0].statements()[0].clone()
    }

    fn values_of(statement: &sea_orm::Statement) -> Vec<sea_orm::Value> {
        statement
            .values
            .as_ref()
            .map(|values| values.0.clone())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn find_active_listing_skips_the_reserved_user_and_inactive_users() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        find_active_listing(&db, None).await?;

        let statement = logged_statement(db);
        assert!(statement
            .sql
            .contains(r#"WHERE "users"."is_active" = $1 AND "users"."id" > $2"#));
        assert!(!statement.sql.contains("user_roles"));
        let expected: Vec<sea_orm::Value> = vec![true.into(), RESERVED_USER_ID.into()];
        assert_eq!(values_of(&statement), expected);

        Ok(())
    }

    #[tokio::test]
    async fn find_active_listing_in_an_organization_keeps_every_role() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        find_active_listing(&db, Some(3)).await?;

        let statement = logged_statement(db);
        assert!(statement.sql.contains(concat!(
            r#""users"."id" > $2 AND "users"."id" IN "#,
            r#"(SELECT "user_id" FROM "casework"."user_roles""#
        )));
        let expected: Vec<sea_orm::Value> = vec![
            true.into(),
            RESERVED_USER_ID.into(),
            3i32.into(),
            Role::Admin.into(),
            Role::Editor.into(),
            Role::Viewer.into(),
        ];
        assert_eq!(values_of(&statement), expected);

        Ok(())
    }

    #[tokio::test]
    async fn find_active_with_roles_only_matches_the_given_roles() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let found = find_active_with_roles(&db, 8, Some(3), &[Role::Admin, Role::Editor]).await?;

        assert!(found.is_none());
        let statement = logged_statement(db);
        assert!(statement.sql.contains(r#""users"."is_active" = $2"#));
        assert!(statement
            .sql
            .contains(r#""users"."id" IN (SELECT "user_id" FROM "casework"."user_roles""#));
        let expected: Vec<sea_orm::Value> = vec![
            8i32.into(),
            true.into(),
            3i32.into(),
            Role::Admin.into(),
            Role::Editor.into(),
            1u64.into(),
        ];
        assert_eq!(values_of(&statement), expected);

        Ok(())
    }

    #[tokio::test]
    async fn find_active_with_roles_without_organization_only_requires_activity(
    ) -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        find_active_with_roles(&db, 8, None, &[]).await?;

        let statement = logged_statement(db);
        assert!(!statement.sql.contains("user_roles"));
        let expected: Vec<sea_orm::Value> = vec![8i32.into(), true.into(), 1u64.into()];
        assert_eq!(values_of(&statement), expected);

        Ok(())
    }

    #[tokio::test]
    async fn authenticate_user_rejects_inactive_users() {
        let user = Model {
            is_active: false,
            ..user_model(6, "gone@example.com")
        };
        let creds = Credentials {
            email: "gone@example.com".to_owned(),
            password: "password123".to_owned(),
            next: None,
        };

        let result = authenticate_user(creds, user).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordUnauthenticated
        );
    }
}
