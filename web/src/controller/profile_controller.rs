use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::{controller::ApiResponse, AppState, Error};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use domain::user::{self as UserApi, SelfForm, UserForm};
use service::config::ApiVersion;

/// GET the current user's own record and the fields they may edit
#[utoipa::path(
    get,
    path = "/profile/self",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved own profile", body = SelfForm),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "The current user has no profile"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let form = UserApi::self_form(app_state.db_conn_ref(), &user).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), form)))
}

/// UPDATE the current user's own record
#[utoipa::path(
    put,
    path = "/profile/self",
    params(ApiVersion),
    request_body = domain::user::UserForm,
    responses(
        (status = 200, description = "Own profile updated", body = SelfForm),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "The current user has no profile"),
        (status = 422, description = "Form errors keyed by field"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(form): Json<UserForm>,
) -> Result<impl IntoResponse, Error> {
    let form = UserApi::update_self(app_state.db_conn_ref(), &user, form).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), form)))
}
