use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::label::IndexParams;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{label as LabelApi, Id};
use log::*;
use service::config::ApiVersion;

/// GET the active labels of an organization
#[utoipa::path(
    get,
    path = "/organizations/{organization_id}/api/labels",
    params(
        ApiVersion,
        ("organization_id" = Id, Path, description = "Organization whose labels are listed"),
        IndexParams,
    ),
    responses(
        (status = 200, description = "Successfully retrieved labels", body = [domain::labels::Model]),
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
    debug!("GET Labels for Organization {organization_id}: {params:?}");

    let labels =
        LabelApi::find_by(app_state.db_conn_ref(), params.in_organization(organization_id))
            .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), labels)))
}

/// GET a label
#[utoipa::path(
    get,
    path = "/organizations/{organization_id}/api/labels/{id}",
    params(
        ApiVersion,
        ("organization_id" = Id, Path, description = "Organization owning the label"),
        ("id" = Id, Path, description = "Label id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a label", body = domain::labels::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Label not found in this organization"),
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
    let label = LabelApi::find_by_id(app_state.db_conn_ref(), organization_id, id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), label)))
}
