use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::Id;
use service::config::ApiVersion;
use std::collections::BTreeMap;

/// Resources browsable under an organization's API root.
const RESOURCES: [&str; 4] = ["actions", "cases", "labels", "partners"];

/// GET the API root of an organization: each resource name mapped to its
/// collection URL.
#[utoipa::path(
    get,
    path = "/organizations/{organization_id}/api",
    params(
        ApiVersion,
        ("organization_id" = Id, Path, description = "Organization whose resources are listed"),
    ),
    responses(
        (status = 200, description = "Successfully retrieved the API root", body = BTreeMap<String, String>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn root(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_user): AuthenticatedUser,
    State(_app_state): State<AppState>,
    Path(organization_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        resource_urls(organization_id),
    )))
}

fn resource_urls(organization_id: Id) -> BTreeMap<&'static str, String> {
    RESOURCES
        .into_iter()
        .map(|resource| {
            (
                resource,
                format!("/organizations/{organization_id}/api/{resource}"),
            )
        })
        .collect()
}
