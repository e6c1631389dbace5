//! The `/users` routes manage users outside of any organization. They are
//! guarded so that only superusers reach them.

use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::response::user::UserDetailResponse;
use crate::{controller::ApiResponse, AppState, Error};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::user::{UserForm, UserSummary};
use domain::{user as UserApi, Id};
use service::config::ApiVersion;

use log::*;

/// INDEX all active Users
#[utoipa::path(
    get,
    path = "/users",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved all Users", body = [UserSummary]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let users = UserApi::list(app_state.db_conn_ref(), None).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), users)))
}

/// CREATE a User without organization roles
#[utoipa::path(
    post,
    path = "/users",
    params(ApiVersion),
    request_body = domain::user::UserForm,
    responses(
        (status = 201, description = "User created successfully", body = UserSummary),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Form errors keyed by field"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(authenticated_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(form): Json<UserForm>,
) -> Result<impl IntoResponse, Error> {
    let user = UserApi::create(app_state.db_conn_ref(), None, form).await?;
    info!("Superuser {} created user {}", authenticated_user.id, user.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), user)),
    ))
}

/// GET any active User
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(
        ApiVersion,
        ("user_id" = Id, Path, description = "The ID of the user to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a User", body = UserDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(authenticated_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(user_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    let detail = UserApi::read(app_state.db_conn_ref(), &authenticated_user, None, user_id).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        UserDetailResponse::new(detail, None),
    )))
}

/// UPDATE any User
#[utoipa::path(
    put,
    path = "/users/{user_id}",
    params(
        ApiVersion,
        ("user_id" = Id, Path, description = "The ID of the user to update")
    ),
    request_body = domain::user::UserForm,
    responses(
        (status = 200, description = "User updated successfully", body = UserSummary),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Form errors keyed by field"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(authenticated_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(user_id): Path<Id>,
    Json(form): Json<UserForm>,
) -> Result<impl IntoResponse, Error> {
    let user = UserApi::update(app_state.db_conn_ref(), None, user_id, form).await?;
    info!("Superuser {} updated user {user_id}", authenticated_user.id);

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), user)))
}
