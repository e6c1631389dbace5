use crate::protect::{Predicate, UserIsSuperuser};
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};

/// The top-level `/users` routes act outside any organization, which only
/// superusers may do.
pub(crate) async fn superuser(
    State(app_state): State<AppState>,
    AuthenticatedUser(authenticated_user): AuthenticatedUser,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let checks: Vec<Predicate> = vec![Predicate::new(UserIsSuperuser, vec![])];

    crate::protect::authorize(&app_state, authenticated_user, request, next, checks).await
}
