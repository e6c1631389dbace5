use super::OrganizationPath;
use crate::protect::{Predicate, UserHasPermission, UserInOrganization};
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use axum::{
    extract::{Path, Request, State},
    http::Method,
    middleware::Next,
    response::IntoResponse,
};
use domain::permission::Permission;

/// Checks that the authenticated user belongs to the organization and holds the
/// user permission matching the request:
///
/// | request                         | permission                     |
/// |---------------------------------|--------------------------------|
/// | `POST /users`                   | `profiles.profile_user_create` |
/// | `GET /users`                    | `profiles.profile_user_list`   |
/// | `GET /users/:user_id`           | `profiles.profile_user_read`   |
/// | `PUT /users/:user_id`           | `profiles.profile_user_update` |
///
/// Intended to be given to axum::middleware::from_fn_with_state in the router.
pub(crate) async fn collection(
    State(app_state): State<AppState>,
    AuthenticatedUser(authenticated_user): AuthenticatedUser,
    Path(OrganizationPath { organization_id }): Path<OrganizationPath>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let permission = if request.method() == Method::POST {
        Permission::UserCreate
    } else {
        Permission::UserList
    };

    crate::protect::authorize(
        &app_state,
        authenticated_user,
        request,
        next,
        checks(organization_id, permission),
    )
    .await
}

pub(crate) async fn member(
    State(app_state): State<AppState>,
    AuthenticatedUser(authenticated_user): AuthenticatedUser,
    Path(OrganizationPath { organization_id }): Path<OrganizationPath>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let permission = if request.method() == Method::PUT {
        Permission::UserUpdate
    } else {
        Permission::UserRead
    };

    crate::protect::authorize(
        &app_state,
        authenticated_user,
        request,
        next,
        checks(organization_id, permission),
    )
    .await
}

fn checks(organization_id: domain::Id, permission: Permission) -> Vec<Predicate> {
    vec![
        Predicate::new(UserInOrganization, vec![organization_id]),
        Predicate::new(UserHasPermission(permission), vec![organization_id]),
    ]
}
