use super::OrganizationPath;
use crate::protect::{Predicate, UserInOrganization};
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::IntoResponse,
};

/// Checks that the authenticated user is a member of the organization whose
/// resources are requested. Intended to be given to
/// axum::middleware::from_fn_with_state in the router.
pub(crate) async fn member(
    State(app_state): State<AppState>,
    AuthenticatedUser(authenticated_user): AuthenticatedUser,
    Path(OrganizationPath { organization_id }): Path<OrganizationPath>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let checks: Vec<Predicate> = vec![Predicate::new(UserInOrganization, vec![organization_id])];

    crate::protect::authorize(&app_state, authenticated_user, request, next, checks).await
}
