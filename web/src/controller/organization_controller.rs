use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::organization as OrganizationApi;
use service::config::ApiVersion;

use log::*;

/// GET the organizations the current user holds a role in (every organization
/// for superusers)
#[utoipa::path(
    get,
    path = "/organizations",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved organizations", body = [domain::organizations::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let organizations = if user.is_superuser {
        OrganizationApi::find_all(app_state.db_conn_ref()).await?
    } else {
        OrganizationApi::find_by_user(app_state.db_conn_ref(), user.id).await?
    };

    debug!("Found {} organizations for user {}", organizations.len(), user.id);

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), organizations)))
}
