use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{case as CaseApi, Id};
use log::*;
use service::config::ApiVersion;

/// GET all cases of an organization, most recently opened first
#[utoipa::path(
    get,
    path = "/organizations/{organization_id}/api/cases",
    params(
        ApiVersion,
        ("organization_id" = Id, Path, description = "Organization whose cases are listed"),
    ),
    responses(
        (status = 200, description = "Successfully retrieved cases", body = [domain::case::CaseWithLabels]),
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
) -> Result<impl IntoResponse, Error> {
    let cases = CaseApi::find_by_organization(app_state.db_conn_ref(), organization_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), cases)))
}

/// GET a case with its label ids
#[utoipa::path(
    get,
    path = "/organizations/{organization_id}/api/cases/{id}",
    params(
        ApiVersion,
        ("organization_id" = Id, Path, description = "Organization owning the case"),
        ("id" = Id, Path, description = "Case id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a case", body = domain::case::CaseWithLabels),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Case not found in this organization"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path((organization_id, id)): Path<(Id, Id)>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Case by id: {id}");

    let case = CaseApi::find_by_id(app_state.db_conn_ref(), organization_id, id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), case)))
}
