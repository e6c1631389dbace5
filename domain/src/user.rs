use crate::error::Error;
use crate::permission::{self, Permission};
use crate::user_form::{self, CleanedUser, Field};
use crate::validation::FieldErrors;
use crate::{profiles, roles::Role, users, Id};
use entity_api::{profile, user, user_role};
use log::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

pub use crate::user_form::UserForm;
pub use entity_api::user::{
    find_by_email, find_by_id, AuthSession, Backend, Credentials, NewUser, UserChanges,
};

const DUPLICATE_EMAIL: &str = "User with this Email address already exists.";

/// One row of the user listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Id,
    pub full_name: String,
    pub email: String,
}

/// Where the "edit" button of a user's detail page leads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditLink {
    /// The viewer is looking at their own record.
    OwnProfile,
    /// The viewer may update the record through the organization's user routes.
    Update,
}

/// A user as shown on their detail page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserDetail {
    pub id: Id,
    pub full_name: String,
    pub email: String,
    /// Role label within the requesting organization; absent without one.
    pub groups: Option<String>,
    pub title: String,
    pub edit_link: Option<EditLink>,
}

/// The caller's own record together with the fields they may edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct SelfForm {
    pub full_name: String,
    pub email: String,
    pub change_password: bool,
    pub fields: Vec<Field>,
}

impl From<(&users::Model, &profiles::Model)> for SelfForm {
    fn from((user, profile): (&users::Model, &profiles::Model)) -> Self {
        SelfForm {
            full_name: profile.full_name.clone(),
            email: user.email.clone(),
            change_password: profile.change_password,
            fields: user_form::self_fields(profile.change_password),
        }
    }
}

/// Creates a user, their profile and, within an organization, their roles there.
pub async fn create(
    db: &DatabaseConnection,
    organization_id: Option<Id>,
    form: UserForm,
) -> Result<UserSummary, Error> {
    let cleaned = validate(
        db,
        &form,
        &user_form::create_fields(organization_id),
        None,
    )
    .await?;

    let CleanedUser {
        full_name,
        email,
        password,
        change_password,
        groups,
        ..
    } = cleaned;

    let (user, profile) = user::create_with_profile(
        db,
        organization_id,
        groups.unwrap_or_default(),
        NewUser {
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
            full_name: full_name.unwrap_or_default(),
            change_password: change_password.unwrap_or(false),
        },
    )
    .await?;

    Ok(UserSummary {
        id: user.id,
        full_name: profile.full_name,
        email: user.email,
    })
}

/// Updates another user's record. Within an organization only members of that
/// organization can be updated.
pub async fn update(
    db: &DatabaseConnection,
    organization_id: Option<Id>,
    user_id: Id,
    form: UserForm,
) -> Result<UserSummary, Error> {
    let target = find_by_id(db, user_id).await?;
    if let Some(organization_id) = organization_id {
        if !permission::is_member(&target, organization_id) {
            debug!("User {user_id} is not a member of organization {organization_id}");
            return Err(Error::not_found());
        }
    }

    let cleaned = validate(
        db,
        &form,
        &user_form::update_fields(organization_id),
        Some(user_id),
    )
    .await?;
    let password = cleaned.chosen_password().map(str::to_owned);

    let (user, profile) = user::update(
        db,
        user_id,
        UserChanges {
            email: cleaned.email,
            full_name: cleaned.full_name,
            password,
            is_active: cleaned.is_active,
            change_password: None,
            roles: organization_id.zip(cleaned.groups),
        },
    )
    .await?;

    Ok(UserSummary {
        id: user.id,
        full_name: profile.map(|profile| profile.full_name).unwrap_or_default(),
        email: user.email,
    })
}

/// The self-service form of `current_user`. Users without a profile have none.
pub async fn self_form(
    db: &DatabaseConnection,
    current_user: &users::Model,
) -> Result<SelfForm, Error> {
    let profile = profile::find_by_user_id(db, current_user.id)
        .await?
        .ok_or_else(Error::not_found)?;

    Ok(SelfForm::from((current_user, &profile)))
}

/// Applies the self-service form. Setting a password through the `password` field
/// lifts the forced password change.
pub async fn update_self(
    db: &DatabaseConnection,
    current_user: &users::Model,
    form: UserForm,
) -> Result<SelfForm, Error> {
    let existing_profile = profile::find_by_user_id(db, current_user.id)
        .await?
        .ok_or_else(Error::not_found)?;

    let fields = user_form::self_fields(existing_profile.change_password);
    let cleaned = validate(db, &form, &fields, Some(current_user.id)).await?;

    let change_password = if fields.contains(&Field::Password) && cleaned.password.is_some() {
        Some(false)
    } else {
        None
    };
    let password = cleaned.chosen_password().map(str::to_owned);

    let (user, profile) = user::update(
        db,
        current_user.id,
        UserChanges {
            email: cleaned.email,
            full_name: cleaned.full_name,
            password,
            change_password,
            ..Default::default()
        },
    )
    .await?;

    let profile = profile.ok_or_else(Error::not_found)?;
    info!("User {} updated their profile", user.id);
    Ok(SelfForm::from((&user, &profile)))
}

/// Loads the detail view of `user_id` as seen by `viewer`.
///
/// Within an organization only active editors and admins of it are visible.
/// Without one, any active user is.
pub async fn read(
    db: &DatabaseConnection,
    viewer: &users::Model,
    organization_id: Option<Id>,
    user_id: Id,
) -> Result<UserDetail, Error> {
    let visible_roles: &[Role] = match organization_id {
        Some(_) => &[Role::Admin, Role::Editor],
        None => &[],
    };
    let (mut user, profile) =
        user::find_active_with_roles(db, user_id, organization_id, visible_roles)
            .await?
            .ok_or_else(Error::not_found)?;

    let groups = match organization_id {
        Some(organization_id) => {
            user.roles = user_role::find_by_user_id(db, user.id).await?;
            let is_admin = permission::is_admin_for(&user, organization_id);
            Some(groups_label(is_admin).to_owned())
        }
        None => None,
    };

    let is_self = user.id == viewer.id;
    let edit_link = if is_self {
        Some(EditLink::OwnProfile)
    } else if permission::has_org_perm(viewer, organization_id, Permission::UserUpdate) {
        Some(EditLink::Update)
    } else {
        None
    };

    Ok(UserDetail {
        id: user.id,
        full_name: profile.map(|profile| profile.full_name).unwrap_or_default(),
        email: user.email,
        groups,
        title: if is_self { "My Profile" } else { "View User" }.to_owned(),
        edit_link,
    })
}

/// Active users other than the reserved system user, ordered by full name.
pub async fn list(
    db: &DatabaseConnection,
    organization_id: Option<Id>,
) -> Result<Vec<UserSummary>, Error> {
    let users = user::find_active_listing(db, organization_id).await?;

    Ok(users
        .into_iter()
        .map(|(user, profile)| UserSummary {
            id: user.id,
            full_name: profile.map(|profile| profile.full_name).unwrap_or_default(),
            email: user.email,
        })
        .collect())
}

fn groups_label(is_admin: bool) -> &'static str {
    if is_admin {
        "Administrator"
    } else {
        "User"
    }
}

/// Cleans `form` against `fields` and makes sure the email is not taken by a user
/// other than `current_user_id`.
async fn validate(
    db: &DatabaseConnection,
    form: &UserForm,
    fields: &[Field],
    current_user_id: Option<Id>,
) -> Result<CleanedUser, Error> {
    let mut errors = FieldErrors::new();

    let cleaned = match form.clean(fields) {
        Ok(cleaned) => Some(cleaned),
        Err(field_errors) => {
            errors = field_errors;
            None
        }
    };

    let email = cleaned
        .as_ref()
        .and_then(|cleaned| cleaned.email.as_deref())
        .or_else(|| {
            if errors.contains(Field::Email.name()) {
                None
            } else {
                form.email.as_deref().map(str::trim)
            }
        });
    if let Some(email) = email.filter(|_| fields.contains(&Field::Email)) {
        if let Some(owner) = find_by_email(db, email).await? {
            if Some(owner.id) != current_user_id {
                errors.add(Field::Email.name(), DUPLICATE_EMAIL);
            }
        }
    }

    match cleaned {
        Some(cleaned) if errors.is_empty() => Ok(cleaned),
        _ => {
            warn!("Rejected user form: {errors}");
            Err(Error::validation(errors))
        }
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, EntityErrorKind, InternalErrorKind};
    use crate::user_roles;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn user_model(id: Id, roles: Vec<user_roles::Model>) -> users::Model {
        let now = Utc::now();
        users::Model {
            id,
            email: format!("user{id}@example.com"),
            password: "hash".to_owned(),
            is_active: true,
            is_superuser: false,
            created_at: now.into(),
            updated_at: now.into(),
            roles,
        }
    }

    fn profile_model(user_id: Id, change_password: bool) -> profiles::Model {
        let now = Utc::now();
        profiles::Model {
            id: user_id + 100,
            user_id,
            full_name: format!("User {user_id}"),
            change_password,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn role_model(user_id: Id, organization_id: Id, role: Role) -> user_roles::Model {
        let now = Utc::now();
        user_roles::Model {
            id: user_id * 10,
            role,
            organization_id,
            user_id,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn no_users() -> Vec<(users::Model, Option<user_roles::Model>)> {
        Vec::new()
    }

    #[tokio::test]
    async fn create_rejects_mismatched_passwords_without_writing() {
        // Only the email uniqueness lookup may reach the database
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([no_users()])
            .into_connection();

        let form = UserForm {
            full_name: Some("Casey".to_owned()),
            email: Some("casey@example.com".to_owned()),
            password: Some("password123".to_owned()),
            confirm_password: Some("password124".to_owned()),
            groups: Some(vec![Role::Editor]),
            ..Default::default()
        };

        let error = create(&db, Some(1), form).await.unwrap_err();

        assert!(error
            .field_errors()
            .is_some_and(|errors| errors.contains("confirm_password")));
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_an_email_already_in_use() {
        let existing = user_model(4, vec![]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[(existing, None::<user_roles::Model>)]])
            .into_connection();

        let form = UserForm {
            full_name: Some("Casey".to_owned()),
            email: Some("user4@example.com".to_owned()),
            password: Some("password123".to_owned()),
            confirm_password: Some("password123".to_owned()),
            ..Default::default()
        };

        let error = create(&db, None, form).await.unwrap_err();

        assert_eq!(
            error.field_errors().and_then(|errors| errors.get("email")),
            Some(&[DUPLICATE_EMAIL.to_owned()][..])
        );
    }

    #[tokio::test]
    async fn create_inserts_user_profile_and_roles() -> Result<(), Error> {
        let created = user_model(7, vec![]);
        let profile = profiles::Model {
            full_name: "Casey".to_owned(),
            ..profile_model(7, true)
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([no_users()])
            .append_query_results([[created.clone()]])
            .append_query_results([[profile]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([[role_model(7, 1, Role::Admin)]])
            .into_connection();

        let form = UserForm {
            full_name: Some("Casey".to_owned()),
            email: Some("user7@example.com".to_owned()),
            password: Some("password123".to_owned()),
            confirm_password: Some("password123".to_owned()),
            change_password: Some(true),
            groups: Some(vec![Role::Admin]),
            ..Default::default()
        };

        let summary = create(&db, Some(1), form).await?;

        assert_eq!(
            summary,
            UserSummary {
                id: 7,
                full_name: "Casey".to_owned(),
                email: "user7@example.com".to_owned(),
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_hides_users_outside_the_organization() {
        let outsider = user_model(9, vec![role_model(9, 2, Role::Editor)]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[(
                outsider.clone(),
                Some(outsider.roles[0].clone()),
            )]])
            .into_connection();

        let error = update(&db, Some(1), 9, UserForm::default())
            .await
            .unwrap_err();

        assert_eq!(
            error.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
    }

    #[tokio::test]
    async fn update_rejects_mismatched_passwords_without_writing() {
        let member = user_model(9, vec![role_model(9, 1, Role::Viewer)]);
        // Target lookup and the email uniqueness lookup, nothing else
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[(member.clone(), Some(member.roles[0].clone()))]])
            .append_query_results([no_users()])
            .into_connection();

        let form = UserForm {
            full_name: Some("User 9".to_owned()),
            email: Some("user9@example.com".to_owned()),
            new_password: Some("password123".to_owned()),
            confirm_password: Some("password124".to_owned()),
            groups: Some(vec![Role::Editor]),
            is_active: Some(true),
            ..Default::default()
        };

        let error = update(&db, Some(1), 9, form).await.unwrap_err();

        assert!(error
            .field_errors()
            .is_some_and(|errors| errors.contains("confirm_password")));
        assert_eq!(db.into_transaction_log().len(), 2);
    }

    #[tokio::test]
    async fn self_form_is_not_found_without_a_profile() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<profiles::Model>::new()])
            .into_connection();

        let error = self_form(&db, &user_model(1, vec![])).await.unwrap_err();

        assert_eq!(
            error.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
    }

    #[tokio::test]
    async fn self_form_exposes_password_when_a_change_is_forced() -> Result<(), Error> {
        let user = user_model(5, vec![]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[profile_model(5, true)]])
            .into_connection();

        let form = self_form(&db, &user).await?;

        assert!(form.fields.contains(&Field::Password));
        assert!(!form.fields.contains(&Field::NewPassword));

        Ok(())
    }

    #[tokio::test]
    async fn update_self_with_password_clears_the_forced_change() -> Result<(), Error> {
        let user = user_model(5, vec![]);
        let forced = profile_model(5, true);
        let cleared = profiles::Model {
            change_password: false,
            ..forced.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // profile lookup, email uniqueness lookup
            .append_query_results([[forced.clone()]])
            .append_query_results([[(user.clone(), None::<user_roles::Model>)]])
            // user::update: load, save, profile lookup, profile save, roles
            .append_query_results([[user.clone()]])
            .append_query_results([[user.clone()]])
            .append_query_results([[forced]])
            .append_query_results([[cleared]])
            .append_query_results([Vec::<user_roles::Model>::new()])
            .into_connection();

        let form = UserForm {
            full_name: Some("User 5".to_owned()),
            email: Some(user.email.clone()),
            password: Some("fresh-password".to_owned()),
            confirm_password: Some("fresh-password".to_owned()),
            ..Default::default()
        };

        let updated = update_self(&db, &user, form).await?;

        assert!(!updated.change_password);
        assert!(updated.fields.contains(&Field::NewPassword));
        assert!(!updated.fields.contains(&Field::Password));

        Ok(())
    }

    #[tokio::test]
    async fn read_rejects_users_who_are_not_editors_or_admins() {
        let viewer = user_model(2, vec![role_model(2, 1, Role::Admin)]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<(users::Model, Option<profiles::Model>)>::new()])
            .into_connection();

        let error = read(&db, &viewer, Some(1), 3).await.unwrap_err();

        assert_eq!(
            error.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
    }

    #[tokio::test]
    async fn read_labels_admins_and_offers_update_link() -> Result<(), Error> {
        let viewer = user_model(2, vec![role_model(2, 1, Role::Admin)]);
        let target = user_model(3, vec![]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[(target.clone(), Some(profile_model(3, false)))]])
            .append_query_results([[role_model(3, 1, Role::Admin)]])
            .into_connection();

        let detail = read(&db, &viewer, Some(1), 3).await?;

        assert_eq!(detail.groups.as_deref(), Some("Administrator"));
        assert_eq!(detail.title, "View User");
        assert_eq!(detail.edit_link, Some(EditLink::Update));

        Ok(())
    }

    #[tokio::test]
    async fn read_of_own_record_links_to_self_service() -> Result<(), Error> {
        let viewer = user_model(3, vec![role_model(3, 1, Role::Editor)]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[(viewer.clone(), Some(profile_model(3, false)))]])
            .append_query_results([[role_model(3, 1, Role::Editor)]])
            .into_connection();

        let detail = read(&db, &viewer, Some(1), 3).await?;

        assert_eq!(detail.groups.as_deref(), Some("User"));
        assert_eq!(detail.title, "My Profile");
        assert_eq!(detail.edit_link, Some(EditLink::OwnProfile));

        Ok(())
    }

    #[tokio::test]
    async fn list_maps_profiles_to_summaries() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                (user_model(2, vec![]), Some(profile_model(2, false))),
                (user_model(3, vec![]), None),
            ]])
            .into_connection();

        let users = list(&db, None).await?;

        assert_eq!(users[0].full_name, "User 2");
        assert_eq!(users[1].full_name, "");

        Ok(())
    }
}
