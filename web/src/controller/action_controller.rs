use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::action::IndexParams;
use crate::{AppState, Error};
use domain::{action as ActionApi, Id};
use log::*;
use service::config::ApiVersion;

/// GET the actions of an organization, oldest first
#[utoipa::path(
    get,
    path = "/organizations/{organization_id}/api/actions",
    params(
        ApiVersion,
        ("organization_id" = Id, Path, description = "Organization whose actions are listed"),
        IndexParams,
    ),
    responses(
        (status = 200, description = "Successfully retrieved actions", body = [domain::actions::Model]),
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
    Path(organization_id): Path<Id>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Actions for Organization {organization_id} after {:?}", params.after);

    let actions =
        ActionApi::find_by_organization(app_state.db_conn_ref(), organization_id, params.after)
            .await?;

    debug!("Found {} actions", actions.len());

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), actions)))
}
