//! Authorization middleware for the routers.
//!
//! Each submodule holds the `from_fn_with_state` functions guarding one group of
//! routes. They build a list of [`Predicate`]s and hand it to [`authorize`],
//! which answers 403 as soon as one of them fails.

pub(crate) mod organizations;
pub(crate) mod users;

use crate::AppState;
use async_trait::async_trait;
use axum::{extract::Request, http::StatusCode, middleware::Next, response::IntoResponse};
use domain::permission::{self, Permission};
use domain::{users as Users, Id};
use log::*;

/// Trait representing a single authorization rule.
///
/// Implementors answer **"is the authenticated user allowed to proceed?"**.
/// The rule receives shared application state, the authenticated
/// [`domain::users::Model`] with its roles loaded, and any [`Id`] arguments
/// supplied by the caller.
#[async_trait]
pub trait Check: Send + Sync {
    async fn eval(&self, app: &AppState, user: &Users::Model, args: Vec<Id>) -> bool;
}

/// Pairs a [`Check`] implementation with the arguments it is evaluated with.
///
/// ```rust,ignore
/// let checks = vec![
///     Predicate::new(UserInOrganization, vec![organization_id]),
///     Predicate::new(UserHasPermission(Permission::UserList), vec![organization_id]),
/// ];
/// ```
pub(crate) struct Predicate {
    predicate: Box<dyn Check>,
    args: Vec<Id>,
}

impl Predicate {
    pub(crate) fn new<C: Check + 'static>(predicate: C, args: Vec<Id>) -> Self {
        Self {
            predicate: Box::new(predicate),
            args,
        }
    }

    pub(crate) async fn check(&self, app_state: &AppState, user: &Users::Model) -> bool {
        self.predicate
            .eval(app_state, user, self.args.clone())
            .await
    }
}

/// Axum middleware that enforces one or more [`Predicate`]s.
///
/// Predicates are evaluated in order; the first failing one aborts the request
/// with **403 FORBIDDEN**. When all pass the wrapped handler (`next`) runs.
pub(crate) async fn authorize(
    app_state: &AppState,
    authenticated_user: Users::Model,
    request: Request,
    next: Next,
    checks: Vec<Predicate>,
) -> impl IntoResponse {
    for check in checks {
        if !check.check(app_state, &authenticated_user).await {
            debug!(
                "User {} denied access to {}",
                authenticated_user.id,
                request.uri()
            );
            return (StatusCode::FORBIDDEN, "FORBIDDEN").into_response();
        }
    }
    next.run(request).await
}

/// Passes when the user holds any role in the organization given as the first
/// argument. Superusers pass for every organization.
pub struct UserInOrganization;

#[async_trait]
impl Check for UserInOrganization {
    async fn eval(
        &self,
        _app_state: &AppState,
        authenticated_user: &Users::Model,
        args: Vec<Id>,
    ) -> bool {
        match args.first() {
            Some(&organization_id) => {
                authenticated_user.is_superuser
                    || permission::is_member(authenticated_user, organization_id)
            }
            None => {
                error!("UserInOrganization evaluated without an organization id");
                false
            }
        }
    }
}

/// Passes when the user holds the permission, within the organization given as
/// the first argument or, without arguments, outside any organization.
pub struct UserHasPermission(pub Permission);

#[async_trait]
impl Check for UserHasPermission {
    async fn eval(
        &self,
        _app_state: &AppState,
        authenticated_user: &Users::Model,
        args: Vec<Id>,
    ) -> bool {
        permission::has_org_perm(authenticated_user, args.first().copied(), self.0)
    }
}

pub struct UserIsSuperuser;

#[async_trait]
impl Check for UserIsSuperuser {
    async fn eval(
        &self,
        _app_state: &AppState,
        authenticated_user: &Users::Model,
        _args: Vec<Id>,
    ) -> bool {
        authenticated_user.is_superuser
    }
}
