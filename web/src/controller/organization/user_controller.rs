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

/// INDEX the active users of an organization
#[utoipa::path(
    get,
    path = "/organizations/{organization_id}/users",
    params(
        ApiVersion,
        ("organization_id" = Id, Path, description = "The ID of the organization to retrieve users for")
    ),
    responses(
        (status = 200, description = "Successfully retrieved all Users", body = [UserSummary]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(organization_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    let users = UserApi::list(app_state.db_conn_ref(), Some(organization_id)).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), users)))
}

/// CREATE a User within an organization, with their roles there
#[utoipa::path(
    post,
    path = "/organizations/{organization_id}/users",
    params(
        ApiVersion,
        ("organization_id" = Id, Path, description = "The ID of the organization"),
    ),
    request_body = domain::user::UserForm,
    responses(
        (status = 201, description = "User created successfully", body = UserSummary),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Form errors keyed by field"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub(crate) async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    AuthenticatedUser(authenticated_user): AuthenticatedUser,
    Path(organization_id): Path<Id>,
    Json(form): Json<UserForm>,
) -> Result<impl IntoResponse, Error> {
    let user = UserApi::create(app_state.db_conn_ref(), Some(organization_id), form).await?;
    info!(
        "User {} created user {} in organization {organization_id}",
        authenticated_user.id, user.id
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), user)),
    ))
}

/// GET a User of an organization
#[utoipa::path(
    get,
    path = "/organizations/{organization_id}/users/{user_id}",
    params(
        ApiVersion,
        ("organization_id" = Id, Path, description = "The ID of the organization"),
        ("user_id" = Id, Path, description = "The ID of the user to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a User", body = UserDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not visible in this organization"),
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
    Path((organization_id, user_id)): Path<(Id, Id)>,
) -> Result<impl IntoResponse, Error> {
    let detail = UserApi::read(
        app_state.db_conn_ref(),
        &authenticated_user,
        Some(organization_id),
        user_id,
    )
    .await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        UserDetailResponse::new(detail, Some(organization_id)),
    )))
}

/// UPDATE a member of an organization
#[utoipa::path(
    put,
    path = "/organizations/{organization_id}/users/{user_id}",
    params(
        ApiVersion,
        ("organization_id" = Id, Path, description = "The ID of the organization"),
        ("user_id" = Id, Path, description = "The ID of the user to update")
    ),
    request_body = domain::user::UserForm,
    responses(
        (status = 200, description = "User updated successfully", body = UserSummary),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User is not a member of this organization"),
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
    Path((organization_id, user_id)): Path<(Id, Id)>,
    Json(form): Json<UserForm>,
) -> Result<impl IntoResponse, Error> {
    let user = UserApi::update(
        app_state.db_conn_ref(),
        Some(organization_id),
        user_id,
        form,
    )
    .await?;
    info!(
        "User {} updated user {user_id} in organization {organization_id}",
        authenticated_user.id
    );

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), user)))
}
